use crate::math::densityerror::DensityError;

// ─────────────────────────────────────────────────────────────────────────────
// Truncated Chebychev series  f(x) = 1 + Σ_{i=1..n} c_i·T_i(x),  x ∈ [-1, 1]
// ─────────────────────────────────────────────────────────────────────────────
//
// coefficients[0] multiplies T_1; the T_0 term is fixed to 1.
//
// Terms come from T_0 = 1, T_1 = x, T_{k+1} = 2x·T_k - T_{k-1}, walked once
// with a sliding window, so evaluation is O(n) without storing the terms.
//
// Antiderivatives (first kind):
//   ∫T_0 = x
//   ∫T_1 = x²/2
//   ∫T_i = (T_{i+1}/(i+1) - T_{i-1}/(i-1)) / 2      i ≥ 2

/// Maps `point` from `[lo, hi]` onto `[-1, 1]`.
#[inline]
pub fn map_to_unit(point: f64, lo: f64, hi: f64) -> f64 {
    (2.0 * point - lo - hi) / (hi - lo)
}

/// Rejects reference ranges that cannot define an affine mapping.
pub fn check_reference_range(lo: f64, hi: f64) -> Result<(), DensityError> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(DensityError::NonFiniteBound { lo, hi });
    }
    if hi <= lo {
        return Err(DensityError::DegenerateRange { lo, hi });
    }
    Ok(())
}

/// `1 + Σ c_i·T_i(x)`
pub fn series_value<I>(coefficients: I, x: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 1.0;
    let mut t_prev = 1.0;
    let mut t_curr = x;
    for c in coefficients {
        sum += c * t_curr;
        let t_next = 2.0 * x * t_curr - t_prev;
        t_prev = t_curr;
        t_curr = t_next;
    }
    sum
}

/// Antiderivative of the series at `x`, with `F(0) = 0` for the T_0 part.
pub fn series_antiderivative(coefficients: &[f64], x: f64) -> f64 {
    let mut sum = x;
    let Some((&c1, rest)) = coefficients.split_first() else {
        return sum;
    };
    sum += c1 * x * x / 2.0;

    let mut t_below = x; // T_{i-1}
    let mut t_at = 2.0 * x * x - 1.0; // T_i
    for (offset, &c) in rest.iter().enumerate() {
        let i = (offset + 2) as f64;
        let t_above = 2.0 * x * t_at - t_below;
        sum += c * (t_above / (i + 1.0) - t_below / (i - 1.0)) / 2.0;
        t_below = t_at;
        t_at = t_above;
    }
    sum
}

/// Exact integral of the series over `[sub_lo, sub_hi]`.
///
/// The endpoints are mapped through the full range `[full_lo, full_hi]`, not
/// through the sub-range itself, and the result carries the Jacobian
/// `(full_hi - full_lo) / 2`.
pub fn series_integral(
    coefficients: &[f64],
    sub_lo: f64,
    sub_hi: f64,
    full_lo: f64,
    full_hi: f64,
) -> Result<f64, DensityError> {
    check_reference_range(full_lo, full_hi)?;
    if !sub_lo.is_finite() || !sub_hi.is_finite() {
        return Err(DensityError::NonFiniteBound { lo: sub_lo, hi: sub_hi });
    }
    if coefficients.is_empty() {
        return Ok(sub_hi - sub_lo);
    }
    let a = map_to_unit(sub_lo, full_lo, full_hi);
    let b = map_to_unit(sub_hi, full_lo, full_hi);
    let half_width = 0.5 * (full_hi - full_lo);
    Ok(half_width * (series_antiderivative(coefficients, b) - series_antiderivative(coefficients, a)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn chebychev_direct(n: usize, x: f64) -> f64 {
        (n as f64 * x.acos()).cos()
    }

    fn series_direct(coefficients: &[f64], x: f64) -> f64 {
        1.0 + coefficients
            .iter()
            .enumerate()
            .map(|(idx, c)| c * chebychev_direct(idx + 1, x))
            .sum::<f64>()
    }

    const COEFFICIENT_SETS: [&[f64]; 4] = [
        &[0.3],
        &[0.1, -0.2],
        &[0.05, 0.1, -0.02, 0.01, 0.003],
        &[0.5, -0.4, 0.3, -0.2, 0.1, -0.05, 0.025, 0.0125],
    ];

    #[test]
    fn test_value_matches_trigonometric_form() {
        for coefficients in COEFFICIENT_SETS {
            for step in 0..=40 {
                let x = -1.0 + step as f64 * 0.05;
                assert_abs_diff_eq!(
                    series_value(coefficients.iter().copied(), x),
                    series_direct(coefficients, x),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_empty_series_is_flat() {
        assert_eq!(series_value(std::iter::empty(), 0.7), 1.0);
        assert_eq!(series_antiderivative(&[], 0.7), 0.7);
        assert_eq!(series_integral(&[], 1.25, 3.5, 0.0, 10.0).unwrap(), 3.5 - 1.25);
    }

    #[test]
    fn test_antiderivative_differentiates_back() {
        let h = 1e-6;
        for coefficients in COEFFICIENT_SETS {
            for step in 1..20 {
                let x = -0.95 + step as f64 * 0.095;
                let slope = (series_antiderivative(coefficients, x + h)
                    - series_antiderivative(coefficients, x - h))
                    / (2.0 * h);
                assert_abs_diff_eq!(slope, series_value(coefficients.iter().copied(), x), epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_full_range_mass() {
        // ∫_{-1}^{1} T_k = 2/(1-k²) for even k, 0 for odd k
        for coefficients in COEFFICIENT_SETS {
            let (lo, hi) = (-3.0, 5.0);
            let width = hi - lo;
            let expected = width
                + coefficients
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| (idx + 1) % 2 == 0)
                    .map(|(idx, c)| {
                        let k = (idx + 1) as f64;
                        width * c / (1.0 - k * k)
                    })
                    .sum::<f64>();
            assert_relative_eq!(
                series_integral(coefficients, lo, hi, lo, hi).unwrap(),
                expected,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_single_term_over_unit_range() {
        assert_abs_diff_eq!(series_integral(&[1.0], -1.0, 1.0, -1.0, 1.0).unwrap(), 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_partial_range_uses_full_mapping() {
        // 1 + 0.5·T_1 on [0, 10] is 0.5 + p/10; its integral over [2, 6] is 2 + 1.6
        let value = series_integral(&[0.5], 2.0, 6.0, 0.0, 10.0).unwrap();
        assert_abs_diff_eq!(value, 3.6, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_reference_range() {
        assert!(matches!(
            series_integral(&[0.1], 0.0, 1.0, 3.0, 3.0),
            Err(DensityError::DegenerateRange { .. })
        ));
        assert!(matches!(
            series_integral(&[0.1], 0.0, 1.0, 3.0, 2.0),
            Err(DensityError::DegenerateRange { .. })
        ));
        assert!(matches!(
            series_integral(&[], 0.0, f64::NAN, 0.0, 1.0),
            Err(DensityError::NonFiniteBound { .. })
        ));
    }

    #[test]
    fn test_map_to_unit() {
        assert_eq!(map_to_unit(2.0, 2.0, 6.0), -1.0);
        assert_eq!(map_to_unit(4.0, 2.0, 6.0), 0.0);
        assert_eq!(map_to_unit(6.0, 2.0, 6.0), 1.0);
    }
}
