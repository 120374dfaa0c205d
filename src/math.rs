// ==============================================================================
// math.rs — SMALL SHARED MATH HELPERS
// ------------------------------------------------------------------------------
// Everything chassis-level runs on nalgebra types. These helpers cover the
// handful of operations nalgebra does not spell the way the simulation needs
// them: angle wrapping, exponential smoothing, safe normalization.
// ==============================================================================

use nalgebra::{UnitQuaternion, Vector3};
use std::f32::consts::PI;

use crate::error::ConfigError;

pub type Vec3 = Vector3<f32>;

pub const GRAVITY: f32 = 9.81; // m/s^2

/// Wrap an angle into (-pi, pi].
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    let mut a = (a + PI) % (2.0 * PI);
    if a <= 0.0 {
        a += 2.0 * PI;
    }
    a - PI
}

/// Linear interpolation, t clamped to [0, 1].
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Frame-rate independent exponential approach toward a target.
/// `rate` is 1/s; larger values converge faster.
#[inline]
pub fn smooth(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

/// Normalize, failing on degenerate input. Configuration-time only; the hot
/// path uses `safe_normalize` with a fallback instead.
pub fn unit(v: Vec3) -> Result<Vec3, ConfigError> {
    let m = v.magnitude();
    if m > 1e-6 {
        Ok(v / m)
    } else {
        Err(ConfigError::ZeroLengthVector)
    }
}

#[inline]
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    let m = v.magnitude();
    if m > 1e-6 { v / m } else { fallback }
}

/// Chassis orientation from Euler angles stored as (pitch about X, yaw about
/// Y, roll about Z). Yaw is applied first so forward stays planar for small
/// pitch/roll.
#[inline]
pub fn orientation_from_euler(e: Vec3) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), e.y)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), e.x)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), e.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn wrap_stays_in_range() {
        for k in -8..8 {
            let a = wrap_angle(0.3 + k as f32 * 2.0 * PI);
            assert_relative_eq!(a, 0.3, epsilon = 1e-4);
        }
        assert!(wrap_angle(PI) > 0.0);
        assert!(wrap_angle(3.0 * PI) > 0.0);
    }

    #[test]
    fn unit_rejects_zero() {
        assert_eq!(unit(Vec3::zeros()), Err(ConfigError::ZeroLengthVector));
        let f = unit(Vec3::new(0.0, 0.0, 2.0)).unwrap();
        assert_relative_eq!(f.magnitude(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn smooth_converges() {
        let mut v = 0.0;
        for _ in 0..200 {
            v = smooth(v, 10.0, 4.0, 0.016);
        }
        assert_relative_eq!(v, 10.0, epsilon = 1e-3);
    }
}
