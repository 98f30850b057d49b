use thiserror::Error;

use crate::binning::binning::BinningError;

/// Read accessor for a real-valued quantity owned by someone else.
///
/// Densities and binnings hold these behind `Rc`/`Weak` and call `value()` on
/// every use, so a change made by the owner is visible on the next read.
pub trait RealFunction {
    fn name(&self) -> &str;

    fn value(&self) -> f64;

    fn is_writable(&self) -> bool {
        false
    }

    fn set_value(&self, _value: f64) -> Result<(), ParameterError> {
        Err(ParameterError::NotWritable(self.name().to_owned()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ParameterError
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("parameter '{0}' is not writable")]
    NotWritable(String),

    #[error("parameter '{name}' received non-finite value {value}")]
    NonFiniteValue { name: String, value: f64 },

    #[error("parameter '{name}' has invalid range [{lo}, {hi}]: expected finite lo < hi")]
    InvalidBounds { name: String, lo: f64, hi: f64 },

    #[error(transparent)]
    Binning(#[from] BinningError),
}

/// Checks that `(lo, hi)` is a finite, non-empty interval.
pub fn check_bounds(name: &str, lo: f64, hi: f64) -> Result<(), ParameterError> {
    if !lo.is_finite() || !hi.is_finite() || lo >= hi {
        return Err(ParameterError::InvalidBounds { name: name.to_owned(), lo, hi });
    }
    Ok(())
}
