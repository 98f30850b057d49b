use std::rc::Rc;

use statrs::function::gamma::{
    gamma_lr,
    ln_gamma
};

use crate::math::density::Density;
use crate::math::densityerror::DensityError;
use crate::parameter::realfunction::RealFunction;
use crate::parameter::realvariable::RealVariable;

/// Chi-square density with `ndof` degrees of freedom:
///
/// `f(x) = x^{k/2-1}·e^{-x/2} / (2^{k/2}·Γ(k/2))` for `x > 0`, `0` otherwise.
///
/// Integrals use the regularized lower incomplete gamma function, so the
/// density is normalized over `[0, ∞)`.
pub struct ChiSquareDensity {
    x: Rc<RealVariable>,
    ndof: Rc<dyn RealFunction>,
}

impl ChiSquareDensity {
    pub fn new(x: Rc<RealVariable>, ndof: Rc<dyn RealFunction>) -> ChiSquareDensity {
        ChiSquareDensity { x, ndof }
    }

    pub fn x(&self) -> &Rc<RealVariable> {
        &self.x
    }

    fn half_ndof(&self) -> Result<f64, DensityError> {
        let ndof = self.ndof.value();
        if !ndof.is_finite() || ndof <= 0.0 {
            return Err(DensityError::InvalidDegreesOfFreedom(ndof));
        }
        Ok(0.5 * ndof)
    }

    /// Density at `x`; `0` outside `(0, ∞)`. NaN is an error.
    pub fn evaluate_at(&self, x: f64) -> Result<f64, DensityError> {
        let k2 = self.half_ndof()?;
        if x.is_nan() {
            return Err(DensityError::NonFinitePoint(x));
        }
        if x <= 0.0 || x == f64::INFINITY {
            return Ok(0.0);
        }
        let log_density = (k2 - 1.0) * x.ln() - 0.5 * x - k2 * std::f64::consts::LN_2 - ln_gamma(k2);
        Ok(log_density.exp())
    }

    pub fn evaluate(&self) -> Result<f64, DensityError> {
        self.evaluate_at(self.x.value())
    }

    /// Cumulative distribution `P(k/2, x/2)`.
    pub fn cdf(&self, x: f64) -> Result<f64, DensityError> {
        let k2 = self.half_ndof()?;
        if x.is_nan() {
            return Err(DensityError::NonFinitePoint(x));
        }
        if x <= 0.0 {
            return Ok(0.0);
        }
        if x == f64::INFINITY {
            return Ok(1.0);
        }
        Ok(gamma_lr(k2, 0.5 * x))
    }

    pub fn integral(&self, lo: f64, hi: f64) -> Result<f64, DensityError> {
        if lo.is_nan() || hi.is_nan() {
            return Err(DensityError::NonFiniteBound { lo, hi });
        }
        Ok(self.cdf(hi)? - self.cdf(lo)?)
    }

    /// Integral over a named range of `x` (declared bounds for `None`).
    pub fn integral_over(&self, range_name: Option<&str>) -> Result<f64, DensityError> {
        let (lo, hi) = self.x.range(range_name)?;
        self.integral(lo, hi)
    }
}

impl Density for ChiSquareDensity {
    fn value_at(&self, x: f64) -> Result<f64, DensityError> {
        self.evaluate_at(x)
    }

    fn integral_between(&self, lo: f64, hi: f64) -> Result<f64, DensityError> {
        self.integral(lo, hi)
    }
}
