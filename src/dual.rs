use std::ops::{Add, Div, Mul, Neg, Range, Sub};

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// Vector of values carrying a sparse Jacobian with respect to a fixed set of seed variables.
///
/// Row `i` of the Jacobian holds the partial derivatives of `value[i]` with respect to every
/// seed variable. Arithmetic propagates Jacobians forward with the usual product and quotient
/// rules, so a residual written once against [DualVector] yields both its value and the
/// Jacobian consumed by [solve](crate::newton::solve). The Jacobian is kept in CSR form, so
/// elementwise residuals cost time and memory proportional to their nonzeros.
///
/// Mismatched lengths are programming errors and panic, as they do in nalgebra.
///
/// # Example
/// ```
/// use hermite_interp::DualVector;
/// use nalgebra::DVector;
///
/// let u = DualVector::variable(DVector::from_vec(vec![1.0, 2.0]));
/// let r = &(&u * &u) * 3.0;
///
/// assert_eq!(r.value()[1], 12.0);
/// assert_eq!(r.partial(1, 1), 12.0);
/// assert_eq!(r.partial(1, 0), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct DualVector {
    value: DVector<f64>,
    jacobian: CsrMatrix<f64>,
}

impl DualVector {
    /// Builds a [DualVector] from its parts. `jacobian` must have one row per value.
    pub fn new(value: DVector<f64>, jacobian: CsrMatrix<f64>) -> Self {
        assert_eq!(
            value.len(),
            jacobian.nrows(),
            "Jacobian must have one row per value"
        );
        DualVector { value, jacobian }
    }

    /// Seeds every entry of `value` as an independent variable (identity Jacobian).
    pub fn variable(value: DVector<f64>) -> Self {
        let size = value.len();
        DualVector { value, jacobian: CsrMatrix::identity(size) }
    }

    /// Wraps `value` as a constant with respect to `n_vars` seed variables.
    pub fn constant(value: DVector<f64>, n_vars: usize) -> Self {
        let size = value.len();
        DualVector { value, jacobian: CsrMatrix::zeros(size, n_vars) }
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Number of seed variables the Jacobian is taken against.
    pub fn n_vars(&self) -> usize {
        self.jacobian.ncols()
    }

    /// Plain numeric value, detached from any differentiation.
    pub fn value(&self) -> &DVector<f64> {
        &self.value
    }

    pub fn jacobian(&self) -> &CsrMatrix<f64> {
        &self.jacobian
    }

    /// Partial derivative of entry `row` with respect to seed variable `column`.
    pub fn partial(&self, row: usize, column: usize) -> f64 {
        self.jacobian
            .get_entry(row, column)
            .map_or(0.0, |entry| entry.into_value())
    }

    pub fn dense_jacobian(&self) -> DMatrix<f64> {
        DMatrix::from(&self.jacobian)
    }

    pub fn into_parts(self) -> (DVector<f64>, CsrMatrix<f64>) {
        (self.value, self.jacobian)
    }

    /// Contiguous slice of entries, `range` indexing into the value vector.
    pub fn rows(&self, range: Range<usize>) -> Self {
        let count = range.end.saturating_sub(range.start);
        let mut jacobian = CooMatrix::new(count, self.n_vars());
        for i in 0..count {
            let row = self.jacobian.row(range.start + i);
            for (&j, &v) in row.col_indices().iter().zip(row.values()) {
                jacobian.push(i, j, v);
            }
        }
        DualVector {
            value: self.value.rows(range.start, count).into_owned(),
            jacobian: CsrMatrix::from(&jacobian),
        }
    }

    /// Stacks `parts` end to end. All parts must share the same seed variables.
    pub fn concat(parts: &[DualVector]) -> Self {
        let n_vars = parts.first().map_or(0, |p| p.n_vars());
        let size = parts.iter().map(|p| p.len()).sum();

        let mut value = DVector::zeros(size);
        let mut jacobian = CooMatrix::new(size, n_vars);
        let mut offset = 0;
        for part in parts {
            assert_eq!(part.n_vars(), n_vars, "concatenated parts must share seed variables");
            value.rows_mut(offset, part.len()).copy_from(&part.value);
            for (i, j, &v) in part.jacobian.triplet_iter() {
                jacobian.push(offset + i, j, v);
            }
            offset += part.len();
        }
        DualVector { value, jacobian: CsrMatrix::from(&jacobian) }
    }

    /// Sum of all entries, as a single-entry [DualVector].
    pub fn sum(&self) -> Self {
        let mut totals = vec![0.0; self.n_vars()];
        for (_, j, &v) in self.jacobian.triplet_iter() {
            totals[j] += v;
        }
        let mut jacobian = CooMatrix::new(1, self.n_vars());
        for (j, total) in totals.into_iter().enumerate().filter(|(_, t)| *t != 0.0) {
            jacobian.push(0, j, total);
        }
        DualVector {
            value: DVector::from_element(1, self.value.sum()),
            jacobian: CsrMatrix::from(&jacobian),
        }
    }

    /// Multiplies entry `i` by the constant `factors[i]`.
    pub fn scale_rows(&self, factors: &DVector<f64>) -> Self {
        DualVector {
            value: self.value.component_mul(factors),
            jacobian: scaled_rows(&self.jacobian, factors),
        }
    }

    /// Applies `f` elementwise; `df` is its derivative, used for the chain rule.
    pub fn map<F, DF>(&self, f: F, df: DF) -> Self
    where
        F: Fn(f64) -> f64,
        DF: Fn(f64) -> f64,
    {
        let slopes = self.value.map(&df);
        DualVector {
            value: self.value.map(f),
            jacobian: scaled_rows(&self.jacobian, &slopes),
        }
    }

    pub fn powi(&self, n: i32) -> Self {
        self.map(|v| v.powi(n), |v| n as f64 * v.powi(n - 1))
    }
}

fn scaled(matrix: &CsrMatrix<f64>, factor: f64) -> CsrMatrix<f64> {
    let mut scaled = matrix.clone();
    for value in scaled.values_mut() {
        *value *= factor;
    }
    scaled
}

fn scaled_rows(matrix: &CsrMatrix<f64>, factors: &DVector<f64>) -> CsrMatrix<f64> {
    assert_eq!(matrix.nrows(), factors.len(), "one factor per Jacobian row");
    let mut scaled = matrix.clone();
    for (mut row, factor) in scaled.row_iter_mut().zip(factors.iter()) {
        for value in row.values_mut() {
            *value *= *factor;
        }
    }
    scaled
}

/// `alpha * a + beta * b`; duplicate entries are summed by the COO to CSR conversion.
fn scaled_sum(a: &CsrMatrix<f64>, alpha: f64, b: &CsrMatrix<f64>, beta: f64) -> CsrMatrix<f64> {
    assert_eq!(
        (a.nrows(), a.ncols()),
        (b.nrows(), b.ncols()),
        "Jacobian shapes must match"
    );
    let mut sum = CooMatrix::new(a.nrows(), a.ncols());
    for (i, j, &v) in a.triplet_iter() {
        sum.push(i, j, alpha * v);
    }
    for (i, j, &v) in b.triplet_iter() {
        sum.push(i, j, beta * v);
    }
    CsrMatrix::from(&sum)
}

impl Add<&DualVector> for &DualVector {
    type Output = DualVector;

    fn add(self, rhs: &DualVector) -> DualVector {
        DualVector {
            value: &self.value + &rhs.value,
            jacobian: scaled_sum(&self.jacobian, 1.0, &rhs.jacobian, 1.0),
        }
    }
}

impl Sub<&DualVector> for &DualVector {
    type Output = DualVector;

    fn sub(self, rhs: &DualVector) -> DualVector {
        DualVector {
            value: &self.value - &rhs.value,
            jacobian: scaled_sum(&self.jacobian, 1.0, &rhs.jacobian, -1.0),
        }
    }
}

impl Mul<&DualVector> for &DualVector {
    type Output = DualVector;

    fn mul(self, rhs: &DualVector) -> DualVector {
        DualVector {
            value: self.value.component_mul(&rhs.value),
            jacobian: scaled_sum(
                &scaled_rows(&self.jacobian, &rhs.value),
                1.0,
                &scaled_rows(&rhs.jacobian, &self.value),
                1.0,
            ),
        }
    }
}

impl Div<&DualVector> for &DualVector {
    type Output = DualVector;

    fn div(self, rhs: &DualVector) -> DualVector {
        let value = self.value.component_div(&rhs.value);
        let inverse = rhs.value.map(|v| 1.0 / v);
        let ratio_slope = value.component_mul(&inverse);
        DualVector {
            jacobian: scaled_sum(
                &scaled_rows(&self.jacobian, &inverse),
                1.0,
                &scaled_rows(&rhs.jacobian, &ratio_slope),
                -1.0,
            ),
            value,
        }
    }
}

impl Add<&DVector<f64>> for &DualVector {
    type Output = DualVector;

    fn add(self, rhs: &DVector<f64>) -> DualVector {
        DualVector { value: &self.value + rhs, jacobian: self.jacobian.clone() }
    }
}

impl Sub<&DVector<f64>> for &DualVector {
    type Output = DualVector;

    fn sub(self, rhs: &DVector<f64>) -> DualVector {
        DualVector { value: &self.value - rhs, jacobian: self.jacobian.clone() }
    }
}

impl Mul<&DVector<f64>> for &DualVector {
    type Output = DualVector;

    fn mul(self, rhs: &DVector<f64>) -> DualVector {
        self.scale_rows(rhs)
    }
}

impl Div<&DVector<f64>> for &DualVector {
    type Output = DualVector;

    fn div(self, rhs: &DVector<f64>) -> DualVector {
        self.scale_rows(&rhs.map(|v| 1.0 / v))
    }
}

impl Add<f64> for &DualVector {
    type Output = DualVector;

    fn add(self, rhs: f64) -> DualVector {
        DualVector { value: self.value.add_scalar(rhs), jacobian: self.jacobian.clone() }
    }
}

impl Sub<f64> for &DualVector {
    type Output = DualVector;

    fn sub(self, rhs: f64) -> DualVector {
        DualVector { value: self.value.add_scalar(-rhs), jacobian: self.jacobian.clone() }
    }
}

impl Mul<f64> for &DualVector {
    type Output = DualVector;

    fn mul(self, rhs: f64) -> DualVector {
        DualVector { value: &self.value * rhs, jacobian: scaled(&self.jacobian, rhs) }
    }
}

impl Div<f64> for &DualVector {
    type Output = DualVector;

    fn div(self, rhs: f64) -> DualVector {
        DualVector { value: &self.value / rhs, jacobian: scaled(&self.jacobian, 1.0 / rhs) }
    }
}

impl Mul<&DualVector> for f64 {
    type Output = DualVector;

    fn mul(self, rhs: &DualVector) -> DualVector {
        rhs * self
    }
}

impl Mul<DualVector> for f64 {
    type Output = DualVector;

    fn mul(self, rhs: DualVector) -> DualVector {
        &rhs * self
    }
}

impl Neg for &DualVector {
    type Output = DualVector;

    fn neg(self) -> DualVector {
        DualVector { value: -&self.value, jacobian: scaled(&self.jacobian, -1.0) }
    }
}

impl Neg for DualVector {
    type Output = DualVector;

    fn neg(self) -> DualVector {
        DualVector { value: -self.value, jacobian: scaled(&self.jacobian, -1.0) }
    }
}

// Owned left-hand sides forward to the borrowed implementations.
macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<DualVector> for DualVector {
            type Output = DualVector;

            fn $method(self, rhs: DualVector) -> DualVector {
                (&self).$method(&rhs)
            }
        }

        impl $imp<&DualVector> for DualVector {
            type Output = DualVector;

            fn $method(self, rhs: &DualVector) -> DualVector {
                (&self).$method(rhs)
            }
        }

        impl $imp<DualVector> for &DualVector {
            type Output = DualVector;

            fn $method(self, rhs: DualVector) -> DualVector {
                self.$method(&rhs)
            }
        }

        impl $imp<&DVector<f64>> for DualVector {
            type Output = DualVector;

            fn $method(self, rhs: &DVector<f64>) -> DualVector {
                (&self).$method(rhs)
            }
        }

        impl $imp<f64> for DualVector {
            type Output = DualVector;

            fn $method(self, rhs: f64) -> DualVector {
                (&self).$method(rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);
forward_owned_binop!(Div, div);
