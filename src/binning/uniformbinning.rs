use std::cell::Cell;

use super::binning::{
    check_range,
    uniform_bin_index,
    BinIndex,
    Binning,
    BinningError
};

/// Fixed `[lo, hi]` split into equal-width bins.
pub struct UniformBinning {
    range: Cell<(f64, f64)>,
    num_bins: usize,
}

impl UniformBinning {
    pub fn new(lo: f64, hi: f64, num_bins: usize) -> Result<UniformBinning, BinningError> {
        if num_bins == 0 {
            return Err(BinningError::ZeroBinCount);
        }
        check_range(lo, hi)?;
        Ok(UniformBinning { range: Cell::new((lo, hi)), num_bins })
    }

    fn width(&self) -> f64 {
        let (lo, hi) = self.range.get();
        (hi - lo) / self.num_bins as f64
    }

    fn check_bin(&self, bin: usize) -> Result<(), BinningError> {
        if bin >= self.num_bins {
            return Err(BinningError::BinOutOfRange { bin, count: self.num_bins });
        }
        Ok(())
    }
}

impl Binning for UniformBinning {
    fn num_bins(&self) -> usize {
        self.num_bins
    }

    fn low_bound(&self) -> Result<f64, BinningError> {
        Ok(self.range.get().0)
    }

    fn high_bound(&self) -> Result<f64, BinningError> {
        Ok(self.range.get().1)
    }

    fn boundaries(&self) -> Result<Vec<f64>, BinningError> {
        let (lo, hi) = self.range.get();
        let width = self.width();
        let mut edges: Vec<f64> = (0..self.num_bins).map(|k| lo + k as f64 * width).collect();
        edges.push(hi);
        Ok(edges)
    }

    fn bin_index_of(&self, x: f64) -> Result<BinIndex, BinningError> {
        let (lo, hi) = self.range.get();
        Ok(uniform_bin_index(x, lo, hi, self.width(), self.num_bins))
    }

    fn bin_low(&self, bin: usize) -> Result<f64, BinningError> {
        self.check_bin(bin)?;
        Ok(self.range.get().0 + bin as f64 * self.width())
    }

    fn bin_high(&self, bin: usize) -> Result<f64, BinningError> {
        self.check_bin(bin)?;
        if bin + 1 == self.num_bins {
            return Ok(self.range.get().1);
        }
        Ok(self.range.get().0 + (bin + 1) as f64 * self.width())
    }

    fn average_bin_width(&self) -> Result<f64, BinningError> {
        Ok(self.width())
    }

    fn set_range(&self, lo: f64, hi: f64) -> Result<(), BinningError> {
        check_range(lo, hi)?;
        self.range.set((lo, hi));
        Ok(())
    }
}
