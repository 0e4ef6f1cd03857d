use std::{cmp::Ordering, fmt::Display, str::FromStr};

use nalgebra::DVector;
use ndarray::{Array, ArrayBase, Data, Dimension};

use crate::{
    dual::DualVector,
    error::InterpolationError,
    knot::Knot,
    newton::{self, NewtonConfig, SolverError},
    segment::Segment,
};

/// Shape of the curve between knots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolantKind {
    /// Straight lines between samples.
    #[default]
    Linear,
    /// Natural cubic spline in Hermite form.
    Cubic,
}

impl FromStr for InterpolantKind {
    type Err = InterpolationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(InterpolantKind::Linear),
            "cubic" => Ok(InterpolantKind::Cubic),
            _ => Err(InterpolationError::InvalidInput(format!(
                "unknown interpolant kind '{}'",
                s
            ))),
        }
    }
}

impl Display for InterpolantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpolantKind::Linear => write!(f, "linear"),
            InterpolantKind::Cubic => write!(f, "cubic"),
        }
    }
}

/// One-dimensional piecewise interpolant over strictly increasing nodes.
///
/// The interpolant is immutable once built. Queries outside the node range are extrapolated
/// from the first or last interval; this never fails, but cubic extrapolation can grow quickly.
#[derive(Debug, Clone)]
pub struct Interpolant {
    kind: InterpolantKind,
    knots: Vec<Knot>,
}

impl Interpolant {
    /// Builds an interpolant through `(nodes[i], samples[i])`, copying both slices.
    ///
    /// For [InterpolantKind::Cubic] the per-node first derivatives are fitted with
    /// [newton::solve] so that neighbouring Hermite segments agree in second derivative at
    /// every interior node, with natural conditions at both ends.
    ///
    /// # Errors
    /// [InterpolationError::InvalidInput] for fewer than 2 nodes, mismatched lengths or
    /// nodes that are not strictly increasing.
    /// ```
    /// use hermite_interp::{Interpolant, InterpolantKind};
    ///
    /// let interpolant = Interpolant::new(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0], InterpolantKind::Linear);
    /// assert!(interpolant.unwrap_err().is_invalid_input());
    /// ```
    /// [InterpolationError::SolverConvergence] when the cubic derivative solve fails.
    pub fn new(nodes: &[f64], samples: &[f64], kind: InterpolantKind) -> Result<Self, InterpolationError> {
        Self::with_config(nodes, samples, kind, &NewtonConfig::default())
    }

    /// Same as [Interpolant::new] with explicit stopping rules for the cubic derivative solve.
    pub fn with_config(
        nodes: &[f64],
        samples: &[f64],
        kind: InterpolantKind,
        config: &NewtonConfig,
    ) -> Result<Self, InterpolationError> {
        check_input(nodes, samples)?;

        let knots = match kind {
            InterpolantKind::Linear => nodes
                .iter()
                .zip(samples)
                .map(|(&x, &y)| Knot::linear(x, y))
                .collect(),
            InterpolantKind::Cubic => {
                let slopes = fit_cubic_slopes(nodes, samples, config)?;
                nodes
                    .iter()
                    .zip(samples)
                    .zip(slopes.iter())
                    .map(|((&x, &y), &slope)| Knot::hermite(x, y, slope))
                    .collect()
            }
        };

        Ok(Interpolant { kind, knots })
    }

    pub fn kind(&self) -> InterpolantKind {
        self.kind
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.knots.len()
    }

    /// Always `false`: construction rejects fewer than 2 nodes.
    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    pub fn nodes(&self) -> Vec<f64> {
        self.knots.iter().map(|k| k.get_x()).collect()
    }

    pub fn samples(&self) -> Vec<f64> {
        self.knots.iter().map(|k| k.get_y()).collect()
    }

    /// Fitted first derivatives at the nodes; `None` for linear interpolants.
    pub fn derivatives(&self) -> Option<Vec<f64>> {
        self.knots.iter().map(|k| k.get_slope()).collect()
    }

    /// First and last node coordinates.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0].get_x(), self.knots[self.knots.len() - 1].get_x())
    }

    /// Interval used for every entry of `query`, in logical iteration order.
    pub fn find<S, D>(&self, query: &ArrayBase<S, D>) -> Vec<Segment>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        query.iter().map(|&x| self.segment_at(x)).collect()
    }

    /// Interval used to evaluate at `x`: `nodes[i-1] <= x < nodes[i]`, with `i` clamped into
    /// `[1, N-1]` so that out-of-range points fall on the first or last interval.
    pub fn segment_at(&self, x: f64) -> Segment {
        let index = self.find_interval_index(x);
        Segment::between(&self.knots[index - 1], &self.knots[index])
    }

    /// Interpolated values, with the same shape as `query`.
    /// # Example
    /// ```
    /// use hermite_interp::{Interpolant, InterpolantKind};
    /// use ndarray::array;
    ///
    /// let interpolant = Interpolant::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0], InterpolantKind::Linear).unwrap();
    /// let y = interpolant.evaluate(&array![[0.5], [1.5]]);
    ///
    /// assert_eq!(&[2, 1], y.shape());
    /// assert_eq!(2.5, y[[1, 0]]);
    /// ```
    pub fn evaluate<S, D>(&self, query: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        query.map(|&x| self.evaluate_at(x))
    }

    /// First derivative of the interpolant, with the same shape as `query`.
    ///
    /// Linear interpolants jump at the nodes; a query exactly on an interior node takes the
    /// slope of the interval to its right (`nodes[i-1] <= x < nodes[i]`). A left-sided search
    /// such as numpy's `searchsorted` would return the slope of the interval to its left
    /// instead. Cubic derivatives are continuous, so the choice does not matter for them.
    pub fn derivative<S, D>(&self, query: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        query.map(|&x| self.derivative_at(x))
    }

    pub fn evaluate_at(&self, x: f64) -> f64 {
        self.segment_at(x).evaluate(x)
    }

    pub fn derivative_at(&self, x: f64) -> f64 {
        self.segment_at(x).derivative(x)
    }

    /// Evaluates on a differentiable vector, carrying its Jacobian through the interpolant.
    pub fn evaluate_dual(&self, query: &DualVector) -> DualVector {
        query.map(|x| self.evaluate_at(x), |x| self.derivative_at(x))
    }

    fn find_interval_index(&self, x: f64) -> usize {
        let size = self.knots.len();
        let mut min = 0;
        let mut max = size - 1;

        while max - min > 1 {
            let mid = (min + max) / 2;
            if x < self.knots[mid].get_x() {
                max = mid;
            } else {
                min = mid;
            }
        }
        min + 1
    }
}

fn check_input(nodes: &[f64], samples: &[f64]) -> Result<(), InterpolationError> {
    if nodes.len() < 2 {
        return Err(InterpolationError::InvalidInput(format!(
            "Interpolant must have at least 2 nodes, got {}",
            nodes.len()
        )));
    }
    if nodes.len() != samples.len() {
        return Err(InterpolationError::InvalidInput(format!(
            "{} nodes but {} samples",
            nodes.len(),
            samples.len()
        )));
    }
    if let Some(index) = nodes
        .windows(2)
        .position(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Less))
    {
        return Err(InterpolationError::InvalidInput(format!(
            "nodes must be strictly increasing, got {} then {} at index {}",
            nodes[index],
            nodes[index + 1],
            index + 1
        )));
    }
    Ok(())
}

fn fit_cubic_slopes(nodes: &[f64], samples: &[f64], config: &NewtonConfig) -> Result<DVector<f64>, SolverError> {
    log::debug!("fitting cubic derivatives on {} nodes", nodes.len());

    let grid = (DVector::from_column_slice(nodes), DVector::from_column_slice(samples));
    newton::solve(continuity_residual, DVector::zeros(nodes.len()), &grid, config)
}

/// Second-derivative mismatch at every node for Hermite slopes `yp` over samples `(x, y)`.
///
/// Entry 0 and N-1 are the natural end conditions, interior entries the jump in curvature
/// between the intervals meeting at that node.
fn continuity_residual(yp: &DualVector, (x, y): &(DVector<f64>, DVector<f64>)) -> DualVector {
    let size = x.len();
    let dx = x.rows(1, size - 1) - x.rows(0, size - 1);
    let slope = (y.rows(1, size - 1) - y.rows(0, size - 1)).component_div(&dx);
    let slope_term = &slope * 6.0;

    let left = yp.rows(0..size - 1);
    let right = yp.rows(1..size);
    let curv_left = (&left * -4.0 - &right * 2.0 + &slope_term) / &dx;
    let curv_right = (&right * 4.0 + &left * 2.0 - &slope_term) / &dx;

    DualVector::concat(&[
        curv_left.rows(0..1),
        curv_left.rows(1..size - 1) - curv_right.rows(0..size - 2),
        -curv_right.rows(size - 2..size - 1),
    ])
}
