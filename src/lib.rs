//! One-dimensional piecewise interpolation with linear and natural cubic Hermite interpolants.
//!
//! Cubic interpolants fit their per-node first derivatives by driving a second-derivative
//! continuity residual to zero with a Newton solver. The residual is written against
//! [DualVector], a differentiable vector that supplies the Jacobian the solver needs.
//! Queries are `ndarray` arrays of any shape and outputs keep that shape. Points outside
//! the nodes are extrapolated from the boundary intervals.
//!
//! # Example
//! ```
//! use hermite_interp::{Interpolant, InterpolantKind};
//! use ndarray::array;
//! use assert_approx_eq::assert_approx_eq;
//!
//! let nodes = [0.0, 1.0, 2.0, 3.0];
//! let samples = [0.0, 1.0, 0.0, 1.0];
//! let interpolant = Interpolant::new(&nodes, &samples, InterpolantKind::Cubic).unwrap();
//!
//! let y = interpolant.evaluate(&array![0.5, 1.0]);
//! assert_approx_eq!(0.75, y[0], 1e-9);
//! assert_approx_eq!(1.0, y[1], 1e-12);
//!
//! let slopes = interpolant.derivative(&array![0.0, 3.0]);
//! assert_approx_eq!(5.0 / 3.0, slopes[0], 1e-9);
//! ```

mod dual;
mod error;
mod interpolant;
mod knot;
pub mod newton;
mod segment;

pub use dual::DualVector;
pub use error::InterpolationError;
pub use interpolant::{Interpolant, InterpolantKind};
pub use knot::Knot;
pub use newton::{NewtonConfig, SolverError};
pub use segment::Segment;
