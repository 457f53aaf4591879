//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Clamp a value between a minimum and maximum.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Wrap an angle into the range [-pi, +pi].
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float + std::ops::Rem,
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    let wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    // rem_euclid can return exactly tau for inputs just below zero, in which
    // case the subtraction above leaves +pi where -pi is expected
    if wrapped > pi_t {
        wrapped - tau_t
    } else {
        wrapped
    }
}

/// Convert an angle in degrees to radians.
pub fn deg_to_rad<T>(angle_deg: T) -> T
where
    T: Float,
{
    angle_deg * T::from(std::f64::consts::PI).unwrap() / T::from(180.0).unwrap()
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float + std::ops::Rem,
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() {
        r + rhs.abs()
    } else {
        r
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((1100f64, 1900f64), (-1f64, 1f64), 1500f64), 0f64);
        assert_eq!(lin_map((1100f64, 1900f64), (-1f64, 1f64), 1900f64), 1f64);
        assert_eq!(lin_map((-1f64, 1f64), (1100f64, 1900f64), -1f64), 1100f64);
    }

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(0f64)).abs() < 1e-12);
        assert!((wrap_pi(PI + 0.5) - (-PI + 0.5)).abs() < 1e-12);
        assert!((wrap_pi(-PI - 0.5) - (PI - 0.5)).abs() < 1e-12);
        assert!((wrap_pi(3.0 * PI) - PI).abs() < 1e-9);
    }

    #[test]
    fn test_deg_to_rad() {
        assert!((deg_to_rad(180f64) - PI).abs() < 1e-12);
        assert!((deg_to_rad(97.5f64) - 1.7016960206944713).abs() < 1e-12);
    }
}
