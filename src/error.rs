use thiserror::Error;

use crate::newton::SolverError;

/// Errors returned while building an [Interpolant](crate::Interpolant).
///
/// Queries never fail: points outside the node range are extrapolated from the
/// boundary interval.
#[derive(Debug, Error)]
pub enum InterpolationError {
    /// Malformed construction arguments: too few nodes, nodes not strictly
    /// increasing, mismatched lengths or an unknown interpolant kind.
    #[error("Error in Interpolant: {0}")]
    InvalidInput(String),
    /// Derivative coefficients of a cubic interpolant could not be fitted.
    #[error("Error in Interpolant: cubic derivative solve failed: {0}")]
    SolverConvergence(#[from] SolverError),
}

impl InterpolationError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, InterpolationError::InvalidInput(_))
    }

    pub fn is_solver_convergence(&self) -> bool {
        matches!(self, InterpolationError::SolverConvergence(_))
    }
}
