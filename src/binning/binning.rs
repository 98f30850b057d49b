use std::rc::Rc;

use thiserror::Error;
use uuid::Uuid;

use crate::parameter::realfunction::RealFunction;

// ─────────────────────────────────────────────────────────────────────────────
// BinIndex
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a bin membership query.
///
/// Points outside `[low_bound, high_bound]` are classified, not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinIndex {
    Underflow,
    Inside(usize),
    Overflow,
}

impl BinIndex {
    pub fn is_out_of_range(&self) -> bool {
        !matches!(self, BinIndex::Inside(_))
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            BinIndex::Inside(bin) => Some(*bin),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BinningError
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BinningError {
    #[error("bin count must be positive")]
    ZeroBinCount,

    #[error("inverted binning range: high bound {hi} is not above low bound {lo}")]
    InvertedRange { lo: f64, hi: f64 },

    #[error("non-finite binning range [{lo}, {hi}]")]
    NonFiniteBound { lo: f64, hi: f64 },

    #[error("{0} bound function no longer exists")]
    BoundFunctionDropped(&'static str),

    #[error("bin {bin} out of range for a binning with {count} bins")]
    BinOutOfRange { bin: usize, count: usize },

    #[error("binning is not shareable: already owned by {owner}, requested by {requested}")]
    NotShareable { owner: Uuid, requested: Uuid },

    #[error("a binning needs at least two boundaries, got {0}")]
    TooFewBoundaries(usize),

    #[error("boundaries must be finite and strictly increasing (position {0})")]
    UnsortedBoundaries(usize),

    #[error("could not update {which} bound: {reason}")]
    BoundUpdate { which: &'static str, reason: String },
}

/// Validates a `[lo, hi]` pair used to lay out bins.
pub fn check_range(lo: f64, hi: f64) -> Result<(), BinningError> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(BinningError::NonFiniteBound { lo, hi });
    }
    if hi <= lo {
        return Err(BinningError::InvertedRange { lo, hi });
    }
    Ok(())
}

/// Locates `x` in `num_bins` equal bins starting at `lo`.
///
/// `x == hi` belongs to the last bin.
pub fn uniform_bin_index(x: f64, lo: f64, hi: f64, width: f64, num_bins: usize) -> BinIndex {
    if x.is_nan() || x < lo {
        return BinIndex::Underflow;
    }
    if x > hi {
        return BinIndex::Overflow;
    }
    let bin = ((x - lo) / width).floor() as usize;
    BinIndex::Inside(bin.min(num_bins - 1))
}

// ─────────────────────────────────────────────────────────────────────────────
// Binning
// ─────────────────────────────────────────────────────────────────────────────

/// A partition of a real interval into bins.
///
/// Every query may fail because a parameterized binning reads its edges from
/// external functions at call time; fixed binnings always succeed.
pub trait Binning {
    fn num_bins(&self) -> usize;

    fn num_boundaries(&self) -> usize {
        self.num_bins() + 1
    }

    fn low_bound(&self) -> Result<f64, BinningError>;

    fn high_bound(&self) -> Result<f64, BinningError>;

    /// The `num_bins() + 1` ordered bin edges.
    fn boundaries(&self) -> Result<Vec<f64>, BinningError>;

    fn bin_index_of(&self, x: f64) -> Result<BinIndex, BinningError>;

    fn bin_low(&self, bin: usize) -> Result<f64, BinningError>;

    fn bin_high(&self, bin: usize) -> Result<f64, BinningError>;

    fn bin_center(&self, bin: usize) -> Result<f64, BinningError> {
        Ok(0.5 * (self.bin_low(bin)? + self.bin_high(bin)?))
    }

    fn bin_width(&self, bin: usize) -> Result<f64, BinningError> {
        Ok(self.bin_high(bin)? - self.bin_low(bin)?)
    }

    fn average_bin_width(&self) -> Result<f64, BinningError>;

    fn set_range(&self, lo: f64, hi: f64) -> Result<(), BinningError>;

    fn is_shareable(&self) -> bool {
        true
    }

    fn is_parameterized(&self) -> bool {
        false
    }

    fn low_bound_function(&self) -> Option<Rc<dyn RealFunction>> {
        None
    }

    fn high_bound_function(&self) -> Option<Rc<dyn RealFunction>> {
        None
    }

    /// Called when an owner starts holding this binning.
    fn insert_hook(&self, _owner: Uuid) -> Result<(), BinningError> {
        Ok(())
    }

    /// Called when an owner releases this binning.
    fn remove_hook(&self, _owner: Uuid) {}
}
