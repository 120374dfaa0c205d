// ==============================================================================
// model.rs — PER-WHEEL TIRE STATE + COMBINED-SLIP FORCE MODEL
// ==============================================================================
// Inputs per tick:
// - wheel surface speed vs vehicle speed (slip ratio)
// - contact-patch velocity decomposition (slip angle)
// - vertical load from the suspension, surface friction from the environment
//
// Model steps (high-level):
// 1) slip ratio = (wheel_speed - car_speed) / car_speed, clamped [-1, 1]
// 2) carcass heating ~ |slip| * |wheel_speed|, Newton cooling toward ambient
// 3) wear ~ |slip|, doubled above 100 C, scaled by compound
// 4) effective grip = base * temp window * pressure window * wear * compound
// 5) combined slip: a sine-saturated force against mu * Fz, apportioned by
//    the relative magnitudes of slip ratio and slip angle
//
// This is a friction-circle approximation, not an empirical tire model. The
// module does not apply forces; the orchestrator converts the returned
// longitudinal/lateral scalars into world-space forces at the contact point.
// ==============================================================================

use std::f32::consts::FRAC_PI_2;

use nalgebra::Vector3;

use crate::math::{smooth, Vec3};
use crate::tire::compound::Compound;
use crate::tire::types::WheelPos;

const MIN_REFERENCE_SPEED: f32 = 0.5; // m/s, below this slip ratio reads 0
const OPTIMAL_TEMP: f32 = 85.0; // C
const TEMP_FALLOFF_SPAN: f32 = 120.0; // C to reach the grip floor
const GRIP_TEMP_FLOOR: f32 = 0.6;
const OPTIMAL_PRESSURE: f32 = 2.2; // bar
const HEAT_RATE: f32 = 0.012; // C per (m/s of slip-speed product) per s
const COOL_RATE: f32 = 0.35; // 1/s toward ambient
const WEAR_RATE: f32 = 0.0028; // fraction per s at full slip
const SLIP_ANGLE_SATURATION: f32 = 0.6; // rad, ~34 deg

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TireForces {
    pub longitudinal: f32, // N, + along wheel forward
    pub lateral: f32,      // N, + along wheel right
}

/// Tire-intrinsic state for one corner. Suspension geometry lives in the
/// suspension system; the wheel only knows about its own rubber.
#[derive(Debug, Clone)]
pub struct Wheel {
    pub pos: WheelPos,
    pub radius: f32,    // m
    pub base_grip: f32, // friction coefficient at optimum
    pub compound: Compound,

    pub pressure: f32,    // bar
    pub temperature: f32, // C
    pub wear: f32,        // 0..1

    pub slip_ratio: f32, // -1..1, + = wheel spinning faster than ground
    pub slip_angle: f32, // rad

    /// Wheel spin about its axle, integrated from drive/brake/reaction torque.
    pub angular_velocity: f32, // rad/s

    pub world_position: Vec3,
    pub contact_normal: Vec3,
    pub grounded: bool,
}

impl Wheel {
    pub fn new(pos: WheelPos, radius: f32, base_grip: f32, compound: Compound) -> Self {
        Self {
            pos,
            radius: radius.clamp(0.2, 0.6),
            base_grip: base_grip.clamp(0.3, 2.5),
            compound,
            pressure: OPTIMAL_PRESSURE,
            temperature: 20.0,
            wear: 0.0,
            slip_ratio: 0.0,
            slip_angle: 0.0,
            angular_velocity: 0.0,
            world_position: Vector3::zeros(),
            contact_normal: Vector3::y(),
            grounded: true,
        }
    }

    /// Wheel surface speed at the contact patch.
    #[inline]
    pub fn surface_speed(&self) -> f32 {
        self.angular_velocity * self.radius
    }

    /// Update slip ratio plus the thermal/wear bookkeeping driven by it.
    pub fn update_slip(&mut self, wheel_speed: f32, car_speed: f32, ambient_temp: f32, dt: f32) {
        self.slip_ratio = if car_speed.abs() > MIN_REFERENCE_SPEED {
            ((wheel_speed - car_speed) / car_speed).clamp(-1.0, 1.0)
        } else {
            0.0
        };

        // Heating from scrubbing, cooling toward ambient
        let heat = self.slip_ratio.abs() * wheel_speed.abs() * HEAT_RATE;
        self.temperature += heat * dt;
        self.temperature = smooth(self.temperature, ambient_temp, COOL_RATE, dt);

        let mut wear_rate = self.slip_ratio.abs() * WEAR_RATE * self.compound.wear_multiplier();
        if self.temperature > 100.0 {
            wear_rate *= 2.0;
        }
        self.wear = (self.wear + wear_rate * dt).clamp(0.0, 1.0);
    }

    /// Slip angle from the contact-patch velocity decomposition,
    /// stable near zero speed.
    pub fn update_slip_angle(&mut self, v_long: f32, v_lat: f32) {
        self.slip_angle = v_lat.atan2(v_long.abs().max(MIN_REFERENCE_SPEED));
    }

    /// Grip coefficient after temperature window, pressure window, wear and
    /// compound are applied.
    pub fn effective_grip(&self, surface_traction: f32) -> f32 {
        let temp_factor =
            (1.0 - (self.temperature - OPTIMAL_TEMP).abs() / TEMP_FALLOFF_SPAN).max(GRIP_TEMP_FLOOR);
        let pressure_factor = (1.0 - (self.pressure - OPTIMAL_PRESSURE).abs() * 0.15).clamp(0.7, 1.0);
        let wear_factor = 1.0 - self.wear * 0.3;
        let compound_factor = self.compound.grip_multiplier(surface_traction);

        self.base_grip * temp_factor * pressure_factor * wear_factor * compound_factor
    }

    /// Combined-slip force. The total demand saturates on a quarter sine and
    /// is split between the longitudinal and lateral channels by how much of
    /// the slip each one contributes.
    pub fn tire_forces(&self, load: f32, surface_friction: f32) -> TireForces {
        if !self.grounded || load <= 0.0 {
            return TireForces::default();
        }

        let max_force = load * self.effective_grip(surface_friction) * surface_friction.max(0.0);

        let long_demand = self.slip_ratio.abs();
        let lat_demand = (self.slip_angle.abs() / SLIP_ANGLE_SATURATION).min(1.0);
        let total = long_demand + lat_demand;
        if total < 1e-4 {
            return TireForces::default();
        }

        let saturation = (total.min(1.0) * FRAC_PI_2).sin();
        let magnitude = max_force * saturation;

        // Positive slip ratio drives the car forward; lateral force opposes
        // the slip angle.
        TireForces {
            longitudinal: magnitude * (long_demand / total) * self.slip_ratio.signum(),
            lateral: -magnitude * (lat_demand / total) * self.slip_angle.signum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wheel() -> Wheel {
        Wheel::new(WheelPos::Rl, 0.33, 1.0, Compound::Medium)
    }

    #[test]
    fn slip_ratio_is_clamped_for_any_input() {
        let mut w = wheel();
        for (ws, cs) in [(1e6, 1.0), (-1e6, 1.0), (40.0, 2.0), (0.0, 30.0), (5.0, 0.0)] {
            w.update_slip(ws, cs, 20.0, 0.01);
            assert!((-1.0..=1.0).contains(&w.slip_ratio), "ws={ws} cs={cs}");
        }
    }

    #[test]
    fn slip_is_zero_near_standstill() {
        let mut w = wheel();
        w.update_slip(3.0, 0.1, 20.0, 0.01);
        assert_eq!(w.slip_ratio, 0.0);
    }

    #[test]
    fn spinning_wheel_heats_and_wears() {
        let mut w = wheel();
        let (t0, w0) = (w.temperature, w.wear);
        for _ in 0..200 {
            w.update_slip(30.0, 15.0, 20.0, 0.01);
        }
        assert!(w.temperature > t0);
        assert!(w.wear > w0);
    }

    #[test]
    fn hot_tire_wears_twice_as_fast() {
        let mut cold = wheel();
        let mut hot = wheel();
        hot.temperature = 120.0;
        // one step each; hot tire also cools a little, so compare wear only
        cold.update_slip(30.0, 15.0, 20.0, 0.01);
        hot.update_slip(30.0, 15.0, 120.0, 0.01);
        assert_relative_eq!(hot.wear, cold.wear * 2.0, epsilon = 1e-6);
    }

    #[test]
    fn grip_peaks_at_optimal_temperature() {
        let mut w = wheel();
        w.temperature = OPTIMAL_TEMP;
        let peak = w.effective_grip(1.0);
        w.temperature = 30.0;
        assert!(w.effective_grip(1.0) < peak);
        w.temperature = 140.0;
        assert!(w.effective_grip(1.0) < peak);
    }

    #[test]
    fn grip_floor_holds_for_extreme_temps() {
        let mut w = wheel();
        w.temperature = 500.0;
        assert!(w.effective_grip(1.0) >= w.base_grip * GRIP_TEMP_FLOOR * 0.7);
    }

    #[test]
    fn worn_tire_grips_less() {
        let mut fresh = wheel();
        fresh.temperature = OPTIMAL_TEMP;
        let mut worn = fresh.clone();
        worn.wear = 1.0;
        assert_relative_eq!(
            worn.effective_grip(1.0),
            fresh.effective_grip(1.0) * 0.7,
            epsilon = 1e-6
        );
    }

    #[test]
    fn force_saturates_at_friction_limit() {
        let mut w = wheel();
        w.temperature = OPTIMAL_TEMP;
        w.slip_ratio = 1.0;
        w.slip_angle = 0.0;
        let f = w.tire_forces(4000.0, 1.0);
        let cap = 4000.0 * w.effective_grip(1.0);
        assert!(f.longitudinal > 0.0);
        assert!(f.longitudinal <= cap + 1e-3);
    }

    #[test]
    fn combined_slip_shares_the_friction_circle() {
        let mut w = wheel();
        w.temperature = OPTIMAL_TEMP;
        w.slip_ratio = 0.5;
        w.slip_angle = 0.3;
        let combined = w.tire_forces(4000.0, 1.0);
        w.slip_angle = 0.0;
        let pure_long = w.tire_forces(4000.0, 1.0);
        assert!(combined.longitudinal.abs() < pure_long.longitudinal.abs());
        assert!(combined.lateral.abs() > 0.0);
    }

    #[test]
    fn airborne_wheel_produces_nothing() {
        let mut w = wheel();
        w.slip_ratio = 0.8;
        w.grounded = false;
        assert_eq!(w.tire_forces(4000.0, 1.0), TireForces::default());
    }
}
