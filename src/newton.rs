use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use thiserror::Error;

use crate::dual::DualVector;

/// Stopping rules for [solve].
///
/// Iteration stops once the residual 2-norm drops to
/// `max(abs_tolerance, rel_tolerance * initial_norm)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonConfig {
    pub abs_tolerance: f64,
    pub rel_tolerance: f64,
    /// Maximum number of Newton steps before giving up.
    pub max_iterations: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        NewtonConfig {
            abs_tolerance: 1e-12,
            rel_tolerance: 1e-10,
            max_iterations: 10,
        }
    }
}

impl NewtonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_abs_tolerance(mut self, abs_tolerance: f64) -> Self {
        self.abs_tolerance = abs_tolerance;
        self
    }

    pub fn with_rel_tolerance(mut self, rel_tolerance: f64) -> Self {
        self.rel_tolerance = rel_tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Failure modes of [solve]. None of them are retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("residual has {equations} equations for {unknowns} unknowns")]
    ShapeMismatch { equations: usize, unknowns: usize },
    #[error("singular Jacobian at iteration {iteration}")]
    SingularJacobian { iteration: usize },
    #[error("non-finite residual at iteration {iteration}")]
    NonFinite { iteration: usize },
    #[error("no convergence after {iterations} iterations (residual norm {residual_norm:e})")]
    NotConverged { iterations: usize, residual_norm: f64 },
}

/// Drives `residual(u, args)` to zero with Newton iterations starting from `initial_guess`.
///
/// The residual is evaluated on `u` seeded as a [DualVector] variable, so its Jacobian comes
/// out of the same evaluation. Each step solves `J * delta = -r` by a banded LU decomposition
/// with partial pivoting, so a Jacobian with bandwidth `w` costs `O(N * w^2)` per step; there
/// is no line search or damping. `args` carries fixed data the residual needs but is not
/// differentiated against.
///
/// # Example
/// ```
/// use hermite_interp::newton::{solve, NewtonConfig};
/// use hermite_interp::DualVector;
/// use nalgebra::DVector;
///
/// // u^2 = target
/// let root = solve(
///     |u: &DualVector, target: &f64| &(u * u) - *target,
///     DVector::from_element(1, 1.0),
///     &2.0,
///     &NewtonConfig::default(),
/// ).unwrap();
///
/// assert!((root[0] - 2.0_f64.sqrt()).abs() < 1e-10);
/// ```
///
/// # Errors
/// See [SolverError].
pub fn solve<A, F>(
    residual: F,
    initial_guess: DVector<f64>,
    args: &A,
    config: &NewtonConfig,
) -> Result<DVector<f64>, SolverError>
where
    A: ?Sized,
    F: Fn(&DualVector, &A) -> DualVector,
{
    let unknowns = initial_guess.len();
    let mut u = initial_guess;
    let mut tolerance = config.abs_tolerance;
    let mut iteration = 0;

    loop {
        let (r, jacobian) = residual(&DualVector::variable(u.clone()), args).into_parts();
        if r.len() != unknowns || jacobian.ncols() != unknowns {
            return Err(SolverError::ShapeMismatch { equations: r.len(), unknowns });
        }
        if r.iter().any(|v| !v.is_finite()) {
            log::warn!("newton: non-finite residual at iteration {}", iteration);
            return Err(SolverError::NonFinite { iteration });
        }

        let residual_norm = r.norm();
        if iteration == 0 {
            tolerance = tolerance.max(config.rel_tolerance * residual_norm);
        }
        log::trace!("newton: iteration {}, residual norm {:e}", iteration, residual_norm);

        if residual_norm <= tolerance {
            log::debug!(
                "newton: converged after {} iterations, residual norm {:e}",
                iteration,
                residual_norm
            );
            return Ok(u);
        }
        if iteration >= config.max_iterations {
            log::warn!(
                "newton: no convergence after {} iterations, residual norm {:e}",
                iteration,
                residual_norm
            );
            return Err(SolverError::NotConverged { iterations: iteration, residual_norm });
        }

        let step = banded_solve(&jacobian, -r).ok_or(SolverError::SingularJacobian { iteration })?;
        u += step;
        iteration += 1;
    }
}

/// Row of a banded matrix, nonzero only on `start..start + values.len()`.
struct BandRow {
    start: usize,
    values: Vec<f64>,
}

impl BandRow {
    fn end(&self) -> usize {
        self.start + self.values.len()
    }

    fn get(&self, column: usize) -> f64 {
        if column < self.start {
            return 0.0;
        }
        self.values.get(column - self.start).copied().unwrap_or(0.0)
    }

    /// `self -= factor * pivot`, zeroing `column` and everything left of it.
    fn eliminate(&mut self, pivot: &BandRow, column: usize, factor: f64) {
        let end = self.end().max(pivot.end());
        self.values.resize(end - self.start, 0.0);
        for c in column + 1..pivot.end() {
            self.values[c - self.start] -= factor * pivot.get(c);
        }
        self.values.drain(..=column - self.start);
        self.start = column + 1;
    }
}

/// Solves `matrix * x = rhs` for square `matrix`, or returns [None] when a pivot vanishes.
fn banded_solve(matrix: &CsrMatrix<f64>, mut rhs: DVector<f64>) -> Option<DVector<f64>> {
    let n = matrix.nrows();
    let mut rows: Vec<BandRow> = (0..n)
        .map(|i| {
            let row = matrix.row(i);
            let columns = row.col_indices();
            let start = columns.first().map_or(i, |&c| c.min(i));
            let end = columns.last().map_or(i + 1, |&c| (c + 1).max(i + 1));
            let mut values = vec![0.0; end - start];
            for (&c, &v) in columns.iter().zip(row.values()) {
                values[c - start] += v;
            }
            BandRow { start, values }
        })
        .collect();
    let lower = rows.iter().enumerate().map(|(i, row)| i - row.start).max().unwrap_or(0);

    for k in 0..n {
        let last = (k + lower).min(n - 1);
        let mut pivot_row = k;
        let mut pivot_size = 0.0;
        for (r, row) in rows.iter().enumerate().take(last + 1).skip(k) {
            let size = row.get(k).abs();
            if size > pivot_size {
                pivot_row = r;
                pivot_size = size;
            }
        }
        if pivot_size == 0.0 {
            return None;
        }
        rows.swap(k, pivot_row);
        rhs.swap_rows(k, pivot_row);

        let (head, tail) = rows.split_at_mut(k + 1);
        let pivot = &head[k];
        for (offset, row) in tail.iter_mut().take(last - k).enumerate() {
            let factor = row.get(k) / pivot.get(k);
            if factor != 0.0 {
                row.eliminate(pivot, k, factor);
                let carried = factor * rhs[k];
                rhs[k + 1 + offset] -= carried;
            }
        }
    }

    for i in (0..n).rev() {
        let row = &rows[i];
        let mut total = rhs[i];
        for c in i + 1..row.end() {
            total -= row.get(c) * rhs[c];
        }
        rhs[i] = total / row.get(i);
    }
    Some(rhs)
}
