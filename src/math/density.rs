use super::densityerror::DensityError;

/// Unnormalized one-dimensional density shape.
pub trait Density {
    fn value_at(&self, x: f64) -> Result<f64, DensityError>;

    /// Exact integral of the shape over `[lo, hi]`.
    fn integral_between(&self, lo: f64, hi: f64) -> Result<f64, DensityError>;
}
