use std::cell::RefCell;
use std::rc::Rc;

use super::chebychevseries::{
    check_reference_range,
    map_to_unit,
    series_integral,
    series_value
};
use crate::math::density::Density;
use crate::math::densityerror::DensityError;
use crate::parameter::realfunction::RealFunction;
use crate::parameter::realvariable::RealVariable;

/// Chebychev polynomial shape `1 + Σ c_i·T_i(x')` over a domain variable.
///
/// `x'` maps the reference range `[lo, hi]` onto `[-1, 1]`:
///
/// `x' = (2x - lo - hi) / (hi - lo)`
///
/// The reference range is the selected normalization range of the domain, or
/// its declared bounds when none is selected. Coefficients and bounds are read
/// on every call; the only state kept here is *which* range is selected.
///
/// Positivity is not checked.
pub struct PolynomialExpansion {
    domain: Rc<RealVariable>,
    coefficients: Vec<Rc<dyn RealFunction>>,
    selected_range: RefCell<Option<String>>,
}

impl PolynomialExpansion {
    pub fn new(domain: Rc<RealVariable>, coefficients: Vec<Rc<dyn RealFunction>>) -> PolynomialExpansion {
        PolynomialExpansion {
            domain,
            coefficients,
            selected_range: RefCell::new(None),
        }
    }

    pub fn domain(&self) -> &Rc<RealVariable> {
        &self.domain
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len()
    }

    pub fn coefficient_values(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.value()).collect()
    }

    pub fn selected_range(&self) -> Option<String> {
        self.selected_range.borrow().clone()
    }

    /// Range-selection hook: records the normalization range that defines the
    /// mapping. `None` restores the domain's declared bounds.
    pub fn on_range_selected(&self, range_name: Option<&str>) {
        let mut selected = self.selected_range.borrow_mut();
        if selected.as_deref() == range_name {
            return;
        }
        log::debug!(
            "expansion over '{}': normalization range {:?} -> {:?}",
            self.domain.name(),
            selected.as_deref(),
            range_name
        );
        *selected = range_name.map(str::to_owned);
    }

    /// Current bounds of the selected reference range.
    pub fn reference_range(&self) -> Result<(f64, f64), DensityError> {
        let selected = self.selected_range.borrow().clone();
        let (lo, hi) = self.domain.range(selected.as_deref())?;
        check_reference_range(lo, hi)?;
        Ok((lo, hi))
    }

    pub fn evaluate(&self, point: f64) -> Result<f64, DensityError> {
        if !point.is_finite() {
            return Err(DensityError::NonFinitePoint(point));
        }
        let (lo, hi) = self.reference_range()?;
        let x = map_to_unit(point, lo, hi);
        Ok(series_value(self.coefficients.iter().map(|c| c.value()), x))
    }

    /// Evaluates at the domain variable's current value.
    pub fn evaluate_current(&self) -> Result<f64, DensityError> {
        self.evaluate(self.domain.value())
    }

    /// Evaluates every point with a single read of the coefficients and range.
    pub fn evaluate_batch(&self, points: &[f64], out: &mut [f64]) -> Result<(), DensityError> {
        if out.len() != points.len() {
            return Err(DensityError::LengthMismatch { expected: points.len(), actual: out.len() });
        }
        if let Some(&point) = points.iter().find(|p| !p.is_finite()) {
            return Err(DensityError::NonFinitePoint(point));
        }
        let (lo, hi) = self.reference_range()?;
        let coefficients = self.coefficient_values();
        for (slot, &point) in out.iter_mut().zip(points) {
            *slot = series_value(coefficients.iter().copied(), map_to_unit(point, lo, hi));
        }
        Ok(())
    }

    /// Exact integral over `[sub_lo, sub_hi]` with `[full_lo, full_hi]` as the
    /// mapping reference.
    pub fn analytic_integral(
        &self,
        sub_lo: f64,
        sub_hi: f64,
        full_lo: f64,
        full_hi: f64,
    ) -> Result<f64, DensityError> {
        series_integral(&self.coefficient_values(), sub_lo, sub_hi, full_lo, full_hi)
    }

    /// Integral over `[sub_lo, sub_hi]` using `range_name` as the reference
    /// range. Selecting a different range first runs the range-selection hook.
    ///
    /// The selection persists: later `evaluate` calls map through
    /// `range_name` until another range (or `None`) is selected.
    pub fn integral(&self, sub_lo: f64, sub_hi: f64, range_name: Option<&str>) -> Result<f64, DensityError> {
        self.on_range_selected(range_name);
        let (full_lo, full_hi) = self.reference_range()?;
        self.analytic_integral(sub_lo, sub_hi, full_lo, full_hi)
    }

    /// Integral over the bounds of `range_name` (declared bounds for `None`),
    /// mapped through the currently selected reference range.
    pub fn integral_over(&self, range_name: Option<&str>) -> Result<f64, DensityError> {
        let (sub_lo, sub_hi) = self.domain.range(range_name)?;
        let (full_lo, full_hi) = self.reference_range()?;
        self.analytic_integral(sub_lo, sub_hi, full_lo, full_hi)
    }
}

impl Density for PolynomialExpansion {
    fn value_at(&self, x: f64) -> Result<f64, DensityError> {
        self.evaluate(x)
    }

    fn integral_between(&self, lo: f64, hi: f64) -> Result<f64, DensityError> {
        let (full_lo, full_hi) = self.reference_range()?;
        self.analytic_integral(lo, hi, full_lo, full_hi)
    }
}
