use thiserror::Error;

use crate::parameter::realfunction::ParameterError;

#[derive(Debug, Error)]
pub enum DensityError {
    /// The reference range used for the affine mapping has no positive width.
    #[error("degenerate range [{lo}, {hi}]: width must be positive")]
    DegenerateRange { lo: f64, hi: f64 },

    #[error("non-finite range [{lo}, {hi}]")]
    NonFiniteBound { lo: f64, hi: f64 },

    #[error("non-finite evaluation point {0}")]
    NonFinitePoint(f64),

    #[error("degrees of freedom must be finite and > 0, got {0}")]
    InvalidDegreesOfFreedom(f64),

    #[error("output length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}
