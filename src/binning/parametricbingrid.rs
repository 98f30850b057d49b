use std::cell::{
    Cell,
    RefCell
};
use std::fmt;
use std::rc::{
    Rc,
    Weak
};

use uuid::Uuid;

use super::binning::{
    check_range,
    uniform_bin_index,
    BinIndex,
    Binning,
    BinningError
};
use super::boundarycache::BoundaryCache;
use crate::parameter::realfunction::RealFunction;

// ─────────────────────────────────────────────────────────────────────────────
// ParametricBinGrid
// ─────────────────────────────────────────────────────────────────────────────
//
// Uniform binning whose edges are two external functions. The grid only keeps
// weak references: the functions belong to the caller, and a grid that outlives
// them reports `BoundFunctionDropped` instead of reading stale values.
//
// Both functions are read on every query. The boundary array is cached against
// the values it was built from, so an edge function that moved on its own is
// never answered from the old array.
//
// A grid belongs to exactly one owner (see `insert_hook`); its edges are tied
// to that owner's functions. Use `duplicate()` to give another owner its own.

pub struct ParametricBinGrid {
    lo_func: RefCell<Weak<dyn RealFunction>>,
    hi_func: RefCell<Weak<dyn RealFunction>>,
    bin_count: Cell<usize>,
    cache: BoundaryCache,
    owner: Cell<Option<Uuid>>,
}

impl ParametricBinGrid {
    pub fn new(
        lo_func: &Rc<dyn RealFunction>,
        hi_func: &Rc<dyn RealFunction>,
        bin_count: usize,
    ) -> Result<ParametricBinGrid, BinningError> {
        if bin_count == 0 {
            return Err(BinningError::ZeroBinCount);
        }
        Ok(ParametricBinGrid {
            lo_func: RefCell::new(Rc::downgrade(lo_func)),
            hi_func: RefCell::new(Rc::downgrade(hi_func)),
            bin_count: Cell::new(bin_count),
            cache: BoundaryCache::new(),
            owner: Cell::new(None),
        })
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count.get()
    }

    pub fn set_bin_count(&self, bin_count: usize) -> Result<(), BinningError> {
        if bin_count == 0 {
            return Err(BinningError::ZeroBinCount);
        }
        self.bin_count.set(bin_count);
        self.cache.invalidate();
        Ok(())
    }

    pub fn set_bound_functions(&self, lo_func: &Rc<dyn RealFunction>, hi_func: &Rc<dyn RealFunction>) {
        *self.lo_func.borrow_mut() = Rc::downgrade(lo_func);
        *self.hi_func.borrow_mut() = Rc::downgrade(hi_func);
        self.cache.invalidate();
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_cached()
    }

    pub fn cache_rebuilds(&self) -> usize {
        self.cache.rebuilds()
    }

    pub fn owner(&self) -> Option<Uuid> {
        self.owner.get()
    }

    /// A new, unowned grid driven by the same functions.
    pub fn duplicate(&self) -> ParametricBinGrid {
        ParametricBinGrid {
            lo_func: RefCell::new(self.lo_func.borrow().clone()),
            hi_func: RefCell::new(self.hi_func.borrow().clone()),
            bin_count: Cell::new(self.bin_count.get()),
            cache: BoundaryCache::new(),
            owner: Cell::new(None),
        }
    }

    fn low_function(&self) -> Result<Rc<dyn RealFunction>, BinningError> {
        self.lo_func
            .borrow()
            .upgrade()
            .ok_or(BinningError::BoundFunctionDropped("low"))
    }

    fn high_function(&self) -> Result<Rc<dyn RealFunction>, BinningError> {
        self.hi_func
            .borrow()
            .upgrade()
            .ok_or(BinningError::BoundFunctionDropped("high"))
    }

    /// Reads both edge functions and validates the interval they span.
    fn current_range(&self) -> Result<(f64, f64), BinningError> {
        let lo = self.low_function()?.value();
        let hi = self.high_function()?.value();
        check_range(lo, hi)?;
        Ok((lo, hi))
    }

    fn check_bin(&self, bin: usize) -> Result<(), BinningError> {
        let count = self.bin_count.get();
        if bin >= count {
            return Err(BinningError::BinOutOfRange { bin, count });
        }
        Ok(())
    }

    fn push_bound(func: &Rc<dyn RealFunction>, which: &'static str, value: f64) -> Result<(), BinningError> {
        if !func.is_writable() {
            log::warn!(
                "ParametricBinGrid::set_range: {} bound '{}' is not writable, leaving it unchanged",
                which,
                func.name()
            );
            return Ok(());
        }
        func.set_value(value)
            .map_err(|error| BinningError::BoundUpdate { which, reason: error.to_string() })
    }
}

impl Binning for ParametricBinGrid {
    fn num_bins(&self) -> usize {
        self.bin_count.get()
    }

    fn low_bound(&self) -> Result<f64, BinningError> {
        Ok(self.low_function()?.value())
    }

    fn high_bound(&self) -> Result<f64, BinningError> {
        Ok(self.high_function()?.value())
    }

    fn boundaries(&self) -> Result<Vec<f64>, BinningError> {
        let (lo, hi) = self.current_range()?;
        Ok(self.cache.boundaries(lo, hi, self.bin_count.get()))
    }

    fn bin_index_of(&self, x: f64) -> Result<BinIndex, BinningError> {
        let (lo, hi) = self.current_range()?;
        let count = self.bin_count.get();
        let width = self.cache.average_width(lo, hi, count);
        Ok(uniform_bin_index(x, lo, hi, width, count))
    }

    fn bin_low(&self, bin: usize) -> Result<f64, BinningError> {
        self.check_bin(bin)?;
        let (lo, hi) = self.current_range()?;
        Ok(lo + bin as f64 * self.cache.average_width(lo, hi, self.bin_count.get()))
    }

    fn bin_high(&self, bin: usize) -> Result<f64, BinningError> {
        self.check_bin(bin)?;
        let (lo, hi) = self.current_range()?;
        let count = self.bin_count.get();
        if bin + 1 == count {
            return Ok(hi);
        }
        Ok(lo + (bin + 1) as f64 * self.cache.average_width(lo, hi, count))
    }

    fn bin_width(&self, bin: usize) -> Result<f64, BinningError> {
        self.check_bin(bin)?;
        self.average_bin_width()
    }

    fn average_bin_width(&self) -> Result<f64, BinningError> {
        let (lo, hi) = self.current_range()?;
        Ok(self.cache.average_width(lo, hi, self.bin_count.get()))
    }

    /// Writes `lo`/`hi` into the edge functions that accept writes and drops
    /// the cached boundaries. If the high write fails the low edge is put back,
    /// so an error leaves both edges where they were.
    fn set_range(&self, lo: f64, hi: f64) -> Result<(), BinningError> {
        check_range(lo, hi)?;
        let lo_func = self.low_function()?;
        let hi_func = self.high_function()?;
        let previous_lo = lo_func.value();
        Self::push_bound(&lo_func, "low", lo)?;
        if let Err(error) = Self::push_bound(&hi_func, "high", hi) {
            if lo_func.is_writable() {
                if let Err(restore) = lo_func.set_value(previous_lo) {
                    log::warn!(
                        "ParametricBinGrid::set_range: could not restore low bound '{}': {}",
                        lo_func.name(),
                        restore
                    );
                }
            }
            self.cache.invalidate();
            return Err(error);
        }
        self.cache.invalidate();
        Ok(())
    }

    fn is_shareable(&self) -> bool {
        false
    }

    fn is_parameterized(&self) -> bool {
        true
    }

    fn low_bound_function(&self) -> Option<Rc<dyn RealFunction>> {
        self.lo_func.borrow().upgrade()
    }

    fn high_bound_function(&self) -> Option<Rc<dyn RealFunction>> {
        self.hi_func.borrow().upgrade()
    }

    fn insert_hook(&self, owner: Uuid) -> Result<(), BinningError> {
        match self.owner.get() {
            Some(current) if current != owner => {
                Err(BinningError::NotShareable { owner: current, requested: owner })
            }
            _ => {
                self.owner.set(Some(owner));
                Ok(())
            }
        }
    }

    fn remove_hook(&self, owner: Uuid) {
        if self.owner.get() == Some(owner) {
            self.owner.set(None);
        }
    }
}

impl fmt::Display for ParametricBinGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn describe(func: Option<Rc<dyn RealFunction>>) -> String {
            match func {
                Some(func) => format!("{} = {}", func.name(), func.value()),
                None => "<dropped>".to_owned(),
            }
        }
        writeln!(f, "ParametricBinGrid with {} bins", self.bin_count.get())?;
        writeln!(f, "  low edge:  {}", describe(self.low_bound_function()))?;
        write!(f, "  high edge: {}", describe(self.high_bound_function()))
    }
}
