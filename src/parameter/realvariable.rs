use std::cell::{
    Cell,
    RefCell
};
use std::collections::HashMap;
use std::rc::Rc;

use uuid::Uuid;

use crate::binning::binning::Binning;
use crate::binning::uniformbinning::UniformBinning;
use super::realfunction::{
    check_bounds,
    ParameterError,
    RealFunction
};

/// A writable real variable with declared bounds and named ranges.
///
/// Named ranges are binnings: a fixed range is a one-bin `UniformBinning`,
/// a parameterized range is a `ParametricBinGrid` whose edges move with its
/// driving functions. The variable is the owning context of every binning
/// attached to it, identified by `id()`.
pub struct RealVariable {
    id: Uuid,
    name: String,
    value: Cell<f64>,
    bounds: Cell<(f64, f64)>,
    binnings: RefCell<HashMap<String, Rc<dyn Binning>>>,
}

impl RealVariable {
    pub fn new(name: impl Into<String>, value: f64, lo: f64, hi: f64) -> Result<RealVariable, ParameterError> {
        let name = name.into();
        check_bounds(&name, lo, hi)?;
        if !value.is_finite() {
            return Err(ParameterError::NonFiniteValue { name, value });
        }
        Ok(RealVariable {
            id: Uuid::new_v4(),
            name,
            value: Cell::new(value),
            bounds: Cell::new((lo, hi)),
            binnings: RefCell::new(HashMap::new()),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bounds(&self) -> (f64, f64) {
        self.bounds.get()
    }

    pub fn set_bounds(&self, lo: f64, hi: f64) -> Result<(), ParameterError> {
        check_bounds(&self.name, lo, hi)?;
        self.bounds.set((lo, hi));
        Ok(())
    }

    /// Defines (or redefines) a fixed named range.
    pub fn set_named_range(&self, range_name: &str, lo: f64, hi: f64) -> Result<(), ParameterError> {
        check_bounds(range_name, lo, hi)?;
        let binning = UniformBinning::new(lo, hi, 1)?;
        self.attach_binning(range_name, Rc::new(binning))
    }

    /// Stores `binning` under `range_name`, making this variable its owner.
    ///
    /// Fails with `BinningError::NotShareable` when a non-shareable binning
    /// already belongs to another owner.
    pub fn attach_binning(&self, range_name: &str, binning: Rc<dyn Binning>) -> Result<(), ParameterError> {
        binning.insert_hook(self.id)?;
        let previous = self
            .binnings
            .borrow_mut()
            .insert(range_name.to_owned(), binning.clone());
        if let Some(previous) = previous {
            if !std::ptr::addr_eq(Rc::as_ptr(&previous), Rc::as_ptr(&binning)) && !self.holds(&previous) {
                previous.remove_hook(self.id);
            }
        }
        log::debug!("variable '{}': attached binning '{}'", self.name, range_name);
        Ok(())
    }

    pub fn detach_binning(&self, range_name: &str) -> Option<Rc<dyn Binning>> {
        let removed = self.binnings.borrow_mut().remove(range_name)?;
        if !self.holds(&removed) {
            removed.remove_hook(self.id);
        }
        Some(removed)
    }

    fn holds(&self, binning: &Rc<dyn Binning>) -> bool {
        self.binnings
            .borrow()
            .values()
            .any(|b| std::ptr::addr_eq(Rc::as_ptr(b), Rc::as_ptr(binning)))
    }

    pub fn binning(&self, range_name: &str) -> Option<Rc<dyn Binning>> {
        self.binnings.borrow().get(range_name).cloned()
    }

    pub fn has_range(&self, range_name: &str) -> bool {
        self.binnings.borrow().contains_key(range_name)
    }

    pub fn range_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.binnings.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Bounds of the named range, or the declared bounds for `None`.
    ///
    /// An unknown name falls back to the declared bounds. Parameterized ranges
    /// are read from their driving functions on every call.
    pub fn range(&self, range_name: Option<&str>) -> Result<(f64, f64), ParameterError> {
        let Some(range_name) = range_name else {
            return Ok(self.bounds());
        };
        let binning = self.binning(range_name);
        match binning {
            Some(binning) => {
                let lo = binning.low_bound()?;
                let hi = binning.high_bound()?;
                check_bounds(range_name, lo, hi)?;
                Ok((lo, hi))
            }
            None => {
                log::warn!(
                    "variable '{}': no range named '{}', using declared bounds",
                    self.name,
                    range_name
                );
                Ok(self.bounds())
            }
        }
    }
}

impl RealFunction for RealVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> f64 {
        self.value.get()
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn set_value(&self, value: f64) -> Result<(), ParameterError> {
        if !value.is_finite() {
            return Err(ParameterError::NonFiniteValue { name: self.name.clone(), value });
        }
        self.value.set(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::binning::BinningError;
    use crate::binning::parametricbingrid::ParametricBinGrid;
    use crate::parameter::constantfunction::ConstantFunction;

    #[test]
    fn test_new_rejects_invalid_bounds() {
        assert!(matches!(
            RealVariable::new("x", 0.0, 1.0, 1.0),
            Err(ParameterError::InvalidBounds { .. })
        ));
        assert!(RealVariable::new("x", 0.0, 2.0, 1.0).is_err());
        assert!(RealVariable::new("x", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_named_range_and_default() {
        let x = RealVariable::new("x", 0.5, 0.0, 10.0).unwrap();
        x.set_named_range("signal", 2.0, 5.0).unwrap();
        assert_eq!(x.range(None).unwrap(), (0.0, 10.0));
        assert_eq!(x.range(Some("signal")).unwrap(), (2.0, 5.0));
        assert!(x.has_range("signal"));

        // unknown names use the declared bounds
        assert_eq!(x.range(Some("sideband")).unwrap(), (0.0, 10.0));

        x.set_named_range("signal", 3.0, 4.0).unwrap();
        assert_eq!(x.range(Some("signal")).unwrap(), (3.0, 4.0));
    }

    #[test]
    fn test_parametric_range_follows_functions() {
        let x = RealVariable::new("x", 0.0, -10.0, 10.0).unwrap();
        let lo: Rc<dyn RealFunction> = Rc::new(RealVariable::new("lo", -1.0, -10.0, 10.0).unwrap());
        let hi: Rc<dyn RealFunction> = Rc::new(ConstantFunction::new("hi", 3.0));
        let grid = Rc::new(ParametricBinGrid::new(&lo, &hi, 4).unwrap());
        x.attach_binning("window", grid).unwrap();

        assert_eq!(x.range(Some("window")).unwrap(), (-1.0, 3.0));
        lo.set_value(1.0).unwrap();
        assert_eq!(x.range(Some("window")).unwrap(), (1.0, 3.0));

        lo.set_value(5.0).unwrap();
        assert!(matches!(
            x.range(Some("window")),
            Err(ParameterError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_grid_cannot_be_attached_to_two_variables() {
        let lo: Rc<dyn RealFunction> = Rc::new(ConstantFunction::new("lo", 0.0));
        let hi: Rc<dyn RealFunction> = Rc::new(ConstantFunction::new("hi", 1.0));
        let grid: Rc<dyn Binning> = Rc::new(ParametricBinGrid::new(&lo, &hi, 2).unwrap());

        let x = RealVariable::new("x", 0.0, 0.0, 1.0).unwrap();
        let y = RealVariable::new("y", 0.0, 0.0, 1.0).unwrap();
        x.attach_binning("r", grid.clone()).unwrap();
        // re-attaching to the same owner is fine
        x.attach_binning("r2", grid.clone()).unwrap();
        assert!(matches!(
            y.attach_binning("r", grid.clone()),
            Err(ParameterError::Binning(BinningError::NotShareable { .. }))
        ));

        // once fully released by x, y may take it
        x.detach_binning("r");
        assert!(y.attach_binning("r", grid.clone()).is_err());
        x.detach_binning("r2");
        y.attach_binning("r", grid).unwrap();
    }

    #[test]
    fn test_set_value_rejects_non_finite() {
        let x = RealVariable::new("x", 0.0, 0.0, 1.0).unwrap();
        assert!(x.set_value(f64::INFINITY).is_err());
        x.set_value(0.25).unwrap();
        assert_eq!(x.value(), 0.25);
    }
}
