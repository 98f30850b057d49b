use std::cell::RefCell;

use super::binning::{
    check_range,
    BinIndex,
    Binning,
    BinningError
};

/// Bins with arbitrary, strictly increasing edges.
pub struct IrregularBinning {
    boundaries: RefCell<Vec<f64>>,
}

impl IrregularBinning {
    pub fn new(boundaries: Vec<f64>) -> Result<IrregularBinning, BinningError> {
        Self::check_boundaries(&boundaries)?;
        Ok(IrregularBinning { boundaries: RefCell::new(boundaries) })
    }

    fn check_boundaries(boundaries: &[f64]) -> Result<(), BinningError> {
        if boundaries.len() < 2 {
            return Err(BinningError::TooFewBoundaries(boundaries.len()));
        }
        if let Some(pos) = boundaries.iter().position(|b| !b.is_finite()) {
            return Err(BinningError::UnsortedBoundaries(pos));
        }
        if let Some(pos) = boundaries.windows(2).position(|w| w[1] <= w[0]) {
            return Err(BinningError::UnsortedBoundaries(pos + 1));
        }
        Ok(())
    }

    fn check_bin(&self, bin: usize) -> Result<(), BinningError> {
        let count = self.num_bins();
        if bin >= count {
            return Err(BinningError::BinOutOfRange { bin, count });
        }
        Ok(())
    }
}

impl Binning for IrregularBinning {
    fn num_bins(&self) -> usize {
        self.boundaries.borrow().len() - 1
    }

    fn low_bound(&self) -> Result<f64, BinningError> {
        Ok(self.boundaries.borrow()[0])
    }

    fn high_bound(&self) -> Result<f64, BinningError> {
        let boundaries = self.boundaries.borrow();
        Ok(boundaries[boundaries.len() - 1])
    }

    fn boundaries(&self) -> Result<Vec<f64>, BinningError> {
        Ok(self.boundaries.borrow().clone())
    }

    fn bin_index_of(&self, x: f64) -> Result<BinIndex, BinningError> {
        let boundaries = self.boundaries.borrow();
        let last = boundaries.len() - 1;
        if x.is_nan() || x < boundaries[0] {
            return Ok(BinIndex::Underflow);
        }
        if x > boundaries[last] {
            return Ok(BinIndex::Overflow);
        }
        // first edge strictly above x, minus one; x == high bound lands in the last bin
        let bin = boundaries.partition_point(|&b| b <= x) - 1;
        Ok(BinIndex::Inside(bin.min(last - 1)))
    }

    fn bin_low(&self, bin: usize) -> Result<f64, BinningError> {
        self.check_bin(bin)?;
        Ok(self.boundaries.borrow()[bin])
    }

    fn bin_high(&self, bin: usize) -> Result<f64, BinningError> {
        self.check_bin(bin)?;
        Ok(self.boundaries.borrow()[bin + 1])
    }

    fn average_bin_width(&self) -> Result<f64, BinningError> {
        Ok((self.high_bound()? - self.low_bound()?) / self.num_bins() as f64)
    }

    /// Moves the outer edges to `[lo, hi]`, dropping interior edges that fall
    /// outside.
    fn set_range(&self, lo: f64, hi: f64) -> Result<(), BinningError> {
        check_range(lo, hi)?;
        let mut boundaries = self.boundaries.borrow_mut();
        let mut clipped = Vec::with_capacity(boundaries.len());
        clipped.push(lo);
        clipped.extend(boundaries.iter().copied().filter(|&b| b > lo && b < hi));
        clipped.push(hi);
        *boundaries = clipped;
        Ok(())
    }
}
