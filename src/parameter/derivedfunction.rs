use std::rc::Rc;

use super::realfunction::RealFunction;

/// A quantity computed from other functions each time it is read.
///
/// Nothing is cached here: `value()` re-runs the formula, which in turn reads
/// its inputs fresh.
pub struct DerivedFunction {
    name: String,
    formula: Box<dyn Fn() -> f64>,
}

impl DerivedFunction {
    pub fn new(name: impl Into<String>, formula: impl Fn() -> f64 + 'static) -> DerivedFunction {
        DerivedFunction { name: name.into(), formula: Box::new(formula) }
    }

    /// `offset + slope * source`
    pub fn linear(
        name: impl Into<String>,
        source: Rc<dyn RealFunction>,
        slope: f64,
        offset: f64,
    ) -> DerivedFunction {
        Self::new(name, move || f64::mul_add(slope, source.value(), offset))
    }
}

impl RealFunction for DerivedFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> f64 {
        (self.formula)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::realvariable::RealVariable;

    #[test]
    fn test_linear_follows_source() {
        let mu = Rc::new(RealVariable::new("mu", 1.0, -10.0, 10.0).unwrap());
        let hi = DerivedFunction::linear("hi", mu.clone(), 2.0, 3.0);
        assert_eq!(hi.value(), 5.0);

        mu.set_value(-1.0).unwrap();
        assert_eq!(hi.value(), 1.0);
        assert!(!hi.is_writable());
    }
}
