// ==============================================================================
// rigid_body.rs — CHASSIS RIGID BODY (VELOCITY-VERLET INTEGRATION)
// ------------------------------------------------------------------------------
// Forces and torques accumulate between steps; integrate() consumes them:
// - gravity only while airborne (ground support comes from the suspension)
// - quadratic drag and linear rolling resistance while grounded
// - v' = v + a*dt,  p' = p + 0.5*(v + v')*dt
// - Euler rotation advanced by angular velocity, wrapped into (-pi, pi]
// - fixed angular damping keeps yaw/roll oscillations from ringing
// ==============================================================================

use nalgebra::UnitQuaternion;

use crate::error::ConfigError;
use crate::math::{orientation_from_euler, wrap_angle, Vec3, GRAVITY};

const ANGULAR_DAMPING: f32 = 0.95; // per step

#[derive(Debug, Clone)]
pub struct RigidBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Euler angles (pitch about X, yaw about Y, roll about Z).
    pub rotation: Vec3,
    pub angular_velocity: Vec3, // rad/s

    pub mass: f32,            // kg
    pub angular_inertia: f32, // kg*m^2, scalar box approximation
    pub drag_coefficient: f32,
    pub rolling_resistance: f32,
    pub com_offset: Vec3, // local, relative to geometric center
    pub grounded: bool,

    // accumulated between integrate() calls, reset afterwards
    acceleration: Vec3, // m/s^2
    torque: Vec3,       // N*m
}

impl RigidBody {
    pub fn new(mass: f32) -> Result<Self, ConfigError> {
        if mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(mass));
        }
        Ok(Self {
            position: Vec3::zeros(),
            velocity: Vec3::zeros(),
            rotation: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            mass,
            angular_inertia: mass * 1.2,
            drag_coefficient: 0.35,
            rolling_resistance: 0.015,
            com_offset: Vec3::zeros(),
            grounded: true,
            acceleration: Vec3::zeros(),
            torque: Vec3::zeros(),
        })
    }

    /// Scalar inertia for a box chassis: I = m*(l^2 + w^2)/12.
    pub fn set_inertia_from_box(&mut self, length: f32, width: f32) {
        let l = length.max(0.5);
        let w = width.max(0.5);
        self.angular_inertia = self.mass * (l * l + w * w) / 12.0;
    }

    #[inline]
    pub fn orientation(&self) -> UnitQuaternion<f32> {
        orientation_from_euler(self.rotation)
    }

    /// Chassis forward in world space (+Z local).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::new(0.0, 0.0, 1.0)
    }

    /// Chassis right in world space (+X local).
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.orientation() * Vec3::new(1.0, 0.0, 0.0)
    }

    #[inline]
    pub fn center_of_mass(&self) -> Vec3 {
        self.position + self.orientation() * self.com_offset
    }

    /// World-space velocity of a point rigidly attached to the body:
    /// v(p) = v_com + w x (p - com)
    pub fn point_velocity(&self, point: Vec3) -> Vec3 {
        let r = point - self.center_of_mass();
        self.velocity + self.angular_velocity.cross(&r)
    }

    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force / self.mass;
    }

    /// Linear force plus the lever-arm torque around the center of mass.
    pub fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.apply_force(force);
        let r = point - self.center_of_mass();
        self.torque += r.cross(&force);
    }

    pub fn integrate(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        if !self.grounded {
            self.acceleration.y -= GRAVITY;
        } else {
            let speed = self.velocity.magnitude();
            // quadratic drag + linear rolling resistance
            self.acceleration += self.velocity * (-0.5 * self.drag_coefficient * speed);
            self.acceleration += self.velocity * -self.rolling_resistance;
        }

        let new_velocity = self.velocity + self.acceleration * dt;
        self.position += (self.velocity + new_velocity) * (0.5 * dt);
        self.velocity = new_velocity;

        self.angular_velocity += self.torque / self.angular_inertia * dt;
        self.rotation += self.angular_velocity * dt;
        self.rotation.x = wrap_angle(self.rotation.x);
        self.rotation.y = wrap_angle(self.rotation.y);
        self.rotation.z = wrap_angle(self.rotation.z);

        self.angular_velocity *= ANGULAR_DAMPING;

        self.acceleration = Vec3::zeros();
        self.torque = Vec3::zeros();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_non_positive_mass() {
        assert!(matches!(
            RigidBody::new(0.0),
            Err(ConfigError::NonPositiveMass(_))
        ));
        assert!(matches!(
            RigidBody::new(-10.0),
            Err(ConfigError::NonPositiveMass(_))
        ));
    }

    #[test]
    fn force_free_step_is_pure_translation() {
        let mut body = RigidBody::new(1200.0).unwrap();
        body.drag_coefficient = 0.0;
        body.rolling_resistance = 0.0;
        body.velocity = Vec3::new(3.0, 0.0, 10.0);
        let p0 = body.position;
        let v0 = body.velocity;

        body.integrate(0.01);

        assert_relative_eq!(body.velocity, v0, epsilon = 1e-6);
        assert_relative_eq!(body.position, p0 + v0 * 0.01, epsilon = 1e-6);
    }

    #[test]
    fn repeated_steps_match_one_long_step_without_drag() {
        let mut stepped = RigidBody::new(1000.0).unwrap();
        stepped.drag_coefficient = 0.0;
        stepped.rolling_resistance = 0.0;
        stepped.velocity = Vec3::new(0.0, 0.0, 20.0);

        let mut single = stepped.clone();

        for _ in 0..100 {
            stepped.integrate(0.01);
        }
        single.integrate(1.0);

        assert_relative_eq!(stepped.position, single.position, epsilon = 1e-3);
        assert_relative_eq!(stepped.velocity, single.velocity, epsilon = 1e-6);
    }

    #[test]
    fn drag_breaks_step_size_equivalence() {
        // with drag enabled the integral depends on the step size; this is
        // expected behavior, not a conservation bug
        let mut stepped = RigidBody::new(1000.0).unwrap();
        stepped.velocity = Vec3::new(0.0, 0.0, 30.0);
        let mut single = stepped.clone();

        for _ in 0..100 {
            stepped.integrate(0.01);
        }
        single.integrate(1.0);

        assert!((stepped.position.z - single.position.z).abs() > 1e-3);
    }

    #[test]
    fn airborne_body_falls() {
        let mut body = RigidBody::new(1000.0).unwrap();
        body.grounded = false;
        body.integrate(0.1);
        assert!(body.velocity.y < 0.0);
    }

    #[test]
    fn force_at_point_adds_spin() {
        let mut body = RigidBody::new(1000.0).unwrap();
        body.set_inertia_from_box(4.4, 1.8);
        // push forward at the right-rear corner: nose should yaw right-to-left
        body.apply_force_at_point(Vec3::new(0.0, 0.0, 4000.0), Vec3::new(0.9, 0.0, -1.3));
        body.integrate(0.01);
        assert!(body.angular_velocity.y.abs() > 0.0);
    }

    #[test]
    fn euler_angles_stay_wrapped() {
        let mut body = RigidBody::new(1000.0).unwrap();
        body.angular_velocity = Vec3::new(0.0, 50.0, 0.0);
        for _ in 0..500 {
            body.integrate(0.02);
        }
        assert!(body.rotation.y > -std::f32::consts::PI);
        assert!(body.rotation.y <= std::f32::consts::PI);
    }
}
