// ==============================================================================
// aero.rs — DRAG, DOWNFORCE, SIDE FORCE
// ------------------------------------------------------------------------------
// Quadratic aerodynamic model: all three channels scale with dynamic pressure
// 0.5 * rho * A * v^2. Downforce responds to the active-aero position and the
// ground-effect factor; side force to the yaw angle between heading and
// travel direction.
// ==============================================================================

use crate::math::{safe_normalize, Vec3};

#[derive(Debug, Clone)]
pub struct AerodynamicsData {
    pub drag_coefficient: f32,
    pub downforce_coefficient: f32,
    pub lift_coefficient: f32,
    pub side_force_coefficient: f32,
    pub frontal_area: f32, // m^2
    pub air_density: f32,  // kg/m^3
    pub center_of_pressure: Vec3, // local offset from geometric center
    pub active_aero: f32,  // 0 = closed, 1 = max wing
    pub ground_effect: f32, // multiplier on downforce near the ground
}

impl AerodynamicsData {
    pub fn new(drag_coefficient: f32, downforce_coefficient: f32, frontal_area: f32) -> Self {
        Self {
            drag_coefficient: drag_coefficient.clamp(0.15, 1.5),
            downforce_coefficient: downforce_coefficient.clamp(0.0, 5.0),
            lift_coefficient: 0.05,
            side_force_coefficient: 0.4,
            frontal_area: frontal_area.clamp(1.0, 4.0),
            air_density: 1.225,
            center_of_pressure: Vec3::new(0.0, 0.1, -0.2),
            active_aero: 0.0,
            ground_effect: 1.0,
        }
    }

    pub fn set_active_aero(&mut self, position: f32) {
        self.active_aero = position.clamp(0.0, 1.0);
    }

    #[inline]
    fn dynamic_pressure(&self, speed: f32) -> f32 {
        0.5 * self.air_density * self.frontal_area * speed * speed
    }

    /// Drag opposing motion through the air (velocity relative to wind).
    pub fn drag_force(&self, velocity: Vec3, wind: Vec3) -> Vec3 {
        let relative = velocity - wind;
        let speed = relative.magnitude();
        if speed < 1e-3 {
            return Vec3::zeros();
        }
        let direction = relative / speed;
        // the open wing also costs drag
        let cd = self.drag_coefficient * (1.0 + self.active_aero * 0.25);
        -direction * self.dynamic_pressure(speed) * cd
    }

    /// Net vertical aero force, negative = pressing the car down.
    pub fn downforce(&self, speed: f32) -> f32 {
        let q = self.dynamic_pressure(speed);
        let down = self.downforce_coefficient * (1.0 + self.active_aero * 0.5) * self.ground_effect;
        q * (self.lift_coefficient - down)
    }

    /// Side force from running at a yaw angle to the airflow.
    pub fn side_force(&self, velocity: Vec3, forward: Vec3, right: Vec3) -> Vec3 {
        let speed = velocity.magnitude();
        if speed < 1e-3 {
            return Vec3::zeros();
        }
        let travel = safe_normalize(velocity, forward);
        let yaw_sin = travel.dot(&right);
        -right * self.dynamic_pressure(speed) * self.side_force_coefficient * yaw_sin
    }
}
