// ==============================================================================
// control.rs — NORMALIZED DRIVER INPUTS + PER-TICK ENVIRONMENT
// ------------------------------------------------------------------------------
// Inputs are stored already clamped; the setters are the only write path so a
// bad value can never reach the physics. The environment is a read-only
// snapshot for the duration of one tick.
// ==============================================================================

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ControlInputs {
    throttle: f32, // 0..1
    brake: f32,    // 0..1
    steering: f32, // -1..1
    clutch: f32,   // 0..1, 1 = pedal released (clutch closed)
    handbrake: bool,
}

impl Default for ControlInputs {
    fn default() -> Self {
        Self {
            throttle: 0.0,
            brake: 0.0,
            steering: 0.0,
            clutch: 1.0,
            handbrake: false,
        }
    }
}

impl ControlInputs {
    pub fn set_throttle(&mut self, v: f32) {
        self.throttle = v.clamp(0.0, 1.0);
    }
    pub fn set_brake(&mut self, v: f32) {
        self.brake = v.clamp(0.0, 1.0);
    }
    pub fn set_steering(&mut self, v: f32) {
        self.steering = v.clamp(-1.0, 1.0);
    }
    pub fn set_clutch(&mut self, v: f32) {
        self.clutch = v.clamp(0.0, 1.0);
    }
    pub fn set_handbrake(&mut self, on: bool) {
        self.handbrake = on;
    }

    #[inline]
    pub fn throttle(&self) -> f32 {
        self.throttle
    }
    #[inline]
    pub fn brake(&self) -> f32 {
        self.brake
    }
    #[inline]
    pub fn steering(&self) -> f32 {
        self.steering
    }
    #[inline]
    pub fn clutch(&self) -> f32 {
        self.clutch
    }
    #[inline]
    pub fn handbrake(&self) -> bool {
        self.handbrake
    }
}

/// Track and weather parameters, immutable for the duration of a tick.
#[derive(Debug, Clone, Copy)]
pub struct Environment {
    pub surface_traction: f32, // 1.0 = dry asphalt
    pub ambient_temp: f32,     // C
    pub wind: Vec3,            // m/s, world space
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            surface_traction: 1.0,
            ambient_temp: 20.0,
            wind: Vec3::zeros(),
        }
    }
}

impl Environment {
    pub fn new(surface_traction: f32, ambient_temp: f32, wind: Vec3) -> Self {
        Self {
            surface_traction: surface_traction.clamp(0.05, 1.5),
            ambient_temp: ambient_temp.clamp(-40.0, 60.0),
            wind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_clamp() {
        let mut c = ControlInputs::default();
        c.set_throttle(3.0);
        c.set_brake(-1.0);
        c.set_steering(-7.0);
        assert_eq!(c.throttle(), 1.0);
        assert_eq!(c.brake(), 0.0);
        assert_eq!(c.steering(), -1.0);
    }
}
