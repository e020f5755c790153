//! Small shared math helpers. All take and return f32; degenerate inputs
//! (zero or NaN periods, inverted edges) produce neutral values instead of
//! propagating non-finite results.

/// Hermite smoothstep between `edge0` and `edge1`. Returns 0 when the edges
/// coincide.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return 0.0;
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Non-negative modulo: result in [0, period) for positive periods, 0 for a
/// zero or NaN period.
pub fn wrap(value: f32, period: f32) -> f32 {
    if period == 0.0 || period.is_nan() {
        return 0.0;
    }
    let x = value % period;
    if x < 0.0 {
        x + period
    } else {
        x
    }
}

/// Signed wrap into [-period/2, period/2), periodic in `period`.
pub fn wrap_signed(value: f32, period: f32) -> f32 {
    wrap(value + period * 0.5, period) - period * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn smoothstep_clamps_and_interpolates() {
        assert_eq!(smoothstep(0.0, 1.0, -5.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 5.0), 1.0);
        assert_relative_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_eq!(smoothstep(2.0, 2.0, 3.0), 0.0);
    }

    #[test]
    fn wrap_handles_negative_values_and_zero_period() {
        assert_relative_eq!(wrap(-1.0, 4.0), 3.0);
        assert_relative_eq!(wrap(9.5, 4.0), 1.5);
        assert_eq!(wrap(3.0, 0.0), 0.0);
        assert_eq!(wrap(3.0, f32::NAN), 0.0);
    }

    #[test]
    fn wrap_signed_stays_in_half_open_range() {
        let period = 7.0;
        let mut x = -25.0;
        while x < 25.0 {
            let w = wrap_signed(x, period);
            assert!(
                (-period / 2.0..period / 2.0).contains(&w),
                "wrap_signed({x}) = {w} outside [-{}, {})",
                period / 2.0,
                period / 2.0
            );
            x += 0.37;
        }
    }

    #[test]
    fn wrap_signed_is_periodic() {
        let period = 7.0;
        let mut x = -10.0;
        while x < 10.0 {
            assert_relative_eq!(
                wrap_signed(x + period, period),
                wrap_signed(x, period),
                epsilon = 1e-4
            );
            x += 0.51;
        }
    }
}
