// ==============================================================================
// car.rs — VEHICLE ORCHESTRATOR (PER-TICK UPDATE SEQUENCE)
// ==============================================================================
// Owns one of everything: rigid body, four wheels, engine, transmission,
// brakes, suspension, stability control, aerodynamics. update_physics() runs
// the fixed per-tick sequence:
//
//   1) fuel-empty throttle cut          7) tire forces at the contact points
//   2) engine + gearbox update          8) aerodynamic forces
//   3) wheel world positions            9) drivetrain torque into wheel spin
//   4) loads -> suspension forces      10) rigid-body integration
//   5) brake forces                    11) fuel consumption
//   6) stability-control corrections   12) crash-damage bookkeeping
//
// Conventions: +Y up, +Z chassis forward, +X chassis right. Positive yaw
// rotates the nose to the right. body.position tracks the chassis reference
// point at ground level; the center of mass sits com_height above it.
//
// The suspension output is the single source of truth for tire load. Weight
// transfer enters through the commanded loads, never as a second ad hoc term
// on the tire side.
// ==============================================================================

use log::debug;

use crate::aero::AerodynamicsData;
use crate::brakes::BrakeSystem;
use crate::control::{ControlInputs, Environment};
use crate::engine::Engine;
use crate::error::ConfigError;
use crate::esc::{DriveMode, StabilityControl, StabilityInputs};
use crate::math::{lerp, smooth, wrap_angle, Vec3, GRAVITY};
use crate::rigid_body::RigidBody;
use crate::suspension::SuspensionSystem;
use crate::telemetry::TelemetrySnapshot;
use crate::tire::{Compound, Wheel, WheelPos, WHEEL_POSITIONS};
use crate::transmission::{GearboxKind, Transmission};

const MAX_STEER_RATE: f32 = 2.5; // rad/s at the rack
const WHEEL_INERTIA: f32 = 1.2; // kg*m^2 per corner
const WHEEL_SYNC_RATE: f32 = 8.0; // 1/s, rolling wheels track ground speed
const DIRECT_DRIVE_SPEED: f32 = 3.0; // m/s, below this drive force bypasses slip
const IMPACT_DAMAGE_SPEED: f32 = 15.0; // m/s
const DAMAGE_POWER_PENALTY: f32 = 0.35;
const ESC_BRAKE_AUTHORITY: f32 = 0.35; // share of per-wheel brake force

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DriveType {
    Fwd,
    Rwd,
    Awd,
}

/// Construction-time tuning surface. Values are clamped where they are
/// assigned into the subsystems, so a wild config yields a drivable car, not
/// a panic.
#[derive(Debug, Clone)]
pub struct CarConfig {
    pub mass: f32,      // kg
    pub wheelbase: f32, // m
    pub track_width: f32,
    pub com_height: f32,
    pub front_weight_distribution: f32, // 0.3..0.7

    pub drive_type: DriveType,
    pub awd_front_split: f32, // torque share to the front axle (AWD only)

    pub gear_ratios: Vec<f32>,
    pub reverse_ratio: f32,
    pub final_drive: f32,
    pub gearbox: GearboxKind,

    pub max_power: f32,  // W
    pub max_torque: f32, // Nm
    pub idle_rpm: f32,
    pub redline_rpm: f32,
    pub turbo: bool,

    pub spring_rate: f32, // N/m per corner
    pub damper_rate: f32, // N*s/m per corner

    pub brake_force: f32,            // N total
    pub brake_bias: f32,             // front share
    pub brake_disc_diameter: [f32; 2], // m, front/rear

    pub tire_compound: Compound,
    pub tire_grip: f32,
    pub wheel_radius: f32,

    pub drag_coefficient: f32,
    pub downforce_coefficient: f32,
    pub frontal_area: f32,

    pub max_steer_angle: f32, // rad
    pub ackermann: f32,       // 0 = parallel, 1 = full Ackermann
    pub drive_mode: DriveMode,
}

impl CarConfig {
    /// Rear-driven road coupe, the default tuning target.
    pub fn gt86() -> Self {
        Self {
            mass: 1350.0,
            wheelbase: 2.57,
            track_width: 1.52,
            com_height: 0.46,
            front_weight_distribution: 0.53,
            drive_type: DriveType::Rwd,
            awd_front_split: 0.0,
            gear_ratios: vec![3.63, 2.19, 1.41, 1.0, 0.76, 0.65],
            reverse_ratio: 3.44,
            final_drive: 4.1,
            gearbox: GearboxKind::Manual,
            max_power: 147e3,
            max_torque: 205.0,
            idle_rpm: 900.0,
            redline_rpm: 7400.0,
            turbo: false,
            spring_rate: 62_000.0,
            damper_rate: 7_500.0,
            brake_force: 24_000.0,
            brake_bias: 0.62,
            brake_disc_diameter: [0.326, 0.290],
            tire_compound: Compound::Medium,
            tire_grip: 1.05,
            wheel_radius: 0.31,
            drag_coefficient: 0.27,
            downforce_coefficient: 0.18,
            frontal_area: 2.1,
            max_steer_angle: 0.6,
            ackermann: 0.8,
            drive_mode: DriveMode::Sport,
        }
    }

    /// Turbocharged all-wheel-drive hatch with an automatic box.
    pub fn rally_hatch() -> Self {
        Self {
            mass: 1420.0,
            wheelbase: 2.67,
            track_width: 1.55,
            com_height: 0.50,
            front_weight_distribution: 0.58,
            drive_type: DriveType::Awd,
            awd_front_split: 0.45,
            gear_ratios: vec![3.9, 2.4, 1.6, 1.2, 0.95, 0.78],
            reverse_ratio: 3.6,
            final_drive: 4.3,
            gearbox: GearboxKind::Automatic,
            max_power: 200e3,
            max_torque: 350.0,
            idle_rpm: 850.0,
            redline_rpm: 6800.0,
            turbo: true,
            spring_rate: 70_000.0,
            damper_rate: 8_500.0,
            brake_force: 27_000.0,
            brake_bias: 0.58,
            brake_disc_diameter: [0.340, 0.310],
            tire_compound: Compound::Soft,
            tire_grip: 1.15,
            wheel_radius: 0.33,
            drag_coefficient: 0.35,
            downforce_coefficient: 0.45,
            frontal_area: 2.3,
            max_steer_angle: 0.62,
            ackermann: 0.8,
            drive_mode: DriveMode::Comfort,
        }
    }
}

pub struct Car {
    pub body: RigidBody,
    pub wheels: [Wheel; 4],
    pub engine: Engine,
    pub transmission: Transmission,
    pub brakes: BrakeSystem,
    pub suspension: SuspensionSystem,
    pub esc: StabilityControl,
    pub aero: AerodynamicsData,

    pub inputs: ControlInputs,

    // geometry
    wheelbase: f32,
    track_width: f32,
    com_height: f32,
    front_weight_distribution: f32,
    drive_type: DriveType,
    awd_front_split: f32,
    max_steer_angle: f32,
    ackermann: f32,

    // running state
    steer_angle: f32, // rad, rate-limited rack angle
    rpm: f32,
    fuel: f32,   // 0..1
    damage: f32, // 0..1
    stability_throttle: f32,
    prev_velocity: Vec3,
    lateral_accel: f32,      // m/s^2
    longitudinal_accel: f32, // m/s^2
    pending_impact: f32,     // m/s, reported by the collision collaborator
}

impl Car {
    pub fn new(config: CarConfig) -> Result<Self, ConfigError> {
        let mut body = RigidBody::new(config.mass)?;
        body.set_inertia_from_box(config.wheelbase * 1.6, config.track_width * 1.2);
        body.com_offset = Vec3::new(0.0, config.com_height.clamp(0.2, 0.8), 0.0);
        body.drag_coefficient = 0.0; // aero owns drag, the body keeps rolling resistance
        body.rolling_resistance = 0.012;

        let mut engine = Engine::new(
            config.max_power,
            config.max_torque,
            config.idle_rpm,
            config.redline_rpm,
        );
        engine.turbo = config.turbo;

        let transmission = Transmission::new(
            config.gear_ratios.clone(),
            config.reverse_ratio,
            config.final_drive,
            config.gearbox,
        )?;

        let wheels = WHEEL_POSITIONS.map(|pos| {
            Wheel::new(pos, config.wheel_radius, config.tire_grip, config.tire_compound)
        });

        let mut aero = AerodynamicsData::new(
            config.drag_coefficient,
            config.downforce_coefficient,
            config.frontal_area,
        );
        aero.center_of_pressure = Vec3::new(0.0, config.com_height * 0.6, -0.2);

        let mut brakes = BrakeSystem::new(config.brake_force, config.brake_bias);
        brakes.disc_diameter = [
            config.brake_disc_diameter[0].clamp(0.2, 0.45),
            config.brake_disc_diameter[1].clamp(0.2, 0.45),
        ];

        let idle = engine.idle_rpm;
        Ok(Self {
            body,
            wheels,
            engine,
            transmission,
            brakes,
            suspension: SuspensionSystem::new(config.spring_rate, config.damper_rate, 0.18),
            esc: StabilityControl::new(config.drive_mode),
            aero,
            inputs: ControlInputs::default(),
            wheelbase: config.wheelbase.clamp(2.0, 4.0),
            track_width: config.track_width.clamp(1.2, 2.2),
            com_height: config.com_height.clamp(0.2, 0.8),
            front_weight_distribution: config.front_weight_distribution.clamp(0.3, 0.7),
            drive_type: config.drive_type,
            awd_front_split: config.awd_front_split.clamp(0.2, 0.8),
            max_steer_angle: config.max_steer_angle.clamp(0.3, 0.9),
            ackermann: config.ackermann.clamp(0.0, 1.0),
            steer_angle: 0.0,
            rpm: idle,
            fuel: 1.0,
            damage: 0.0,
            stability_throttle: 1.0,
            prev_velocity: Vec3::zeros(),
            lateral_accel: 0.0,
            longitudinal_accel: 0.0,
            pending_impact: 0.0,
        })
    }

    // ------------------------------------------------------------------
    // public accessors / commands
    // ------------------------------------------------------------------

    #[inline]
    pub fn speed(&self) -> f32 {
        self.body.velocity.magnitude()
    }

    #[inline]
    pub fn speed_kmh(&self) -> f32 {
        self.speed() * 3.6
    }

    #[inline]
    pub fn rpm(&self) -> f32 {
        self.rpm
    }

    #[inline]
    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    #[inline]
    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn set_fuel(&mut self, fuel: f32) {
        self.fuel = fuel.clamp(0.0, 1.0);
    }

    pub fn set_drive_mode(&mut self, mode: DriveMode) {
        self.esc.mode = mode;
    }

    pub fn shift_up(&mut self) -> bool {
        self.transmission.shift_up()
    }

    pub fn shift_down(&mut self) -> bool {
        self.transmission.shift_down()
    }

    pub fn request_gear(&mut self, gear: i8) -> bool {
        self.transmission.start_shift(gear)
    }

    /// Collision reports come from the (external) collision system; the core
    /// only turns them into accumulated damage.
    pub fn register_impact(&mut self, impact_speed: f32) {
        self.pending_impact = self.pending_impact.max(impact_speed.max(0.0));
    }

    /// Power multiplier from accumulated crash damage, composed with the
    /// engine's own internal damage at the point torque is requested.
    #[inline]
    fn damage_power_multiplier(&self) -> f32 {
        1.0 - self.damage * DAMAGE_POWER_PENALTY
    }

    // ------------------------------------------------------------------
    // per-tick update
    // ------------------------------------------------------------------

    pub fn update_physics(&mut self, dt: f32, env: &Environment) {
        if dt <= 0.0 {
            return;
        }

        // (1) no fuel, no fire
        let throttle_pedal = if self.fuel > 0.0 { self.inputs.throttle() } else { 0.0 };

        self.update_steering(dt);

        // (2) gearbox first so the engine sees the gear the tick runs with
        self.transmission.update(
            dt,
            self.rpm,
            throttle_pedal,
            self.engine.shift_rpm,
            self.engine.redline_rpm,
        );
        self.update_engine(dt, throttle_pedal);

        // (3) wheel world positions from the chassis pose
        self.update_wheel_positions();

        // chassis-frame acceleration for load transfer, ESC and telemetry
        let accel = (self.body.velocity - self.prev_velocity) / dt;
        self.prev_velocity = self.body.velocity;
        self.longitudinal_accel = accel.dot(&self.body.forward());
        self.lateral_accel = accel.dot(&self.body.right());

        // (4) loads through the suspension; its output is the tire load
        let static_loads = self.static_loads();
        let loads = self.transferred_loads(&static_loads);
        let sus_forces = self.suspension.update(loads, dt);
        for pos in WHEEL_POSITIONS {
            let i = pos.index();
            let contact = self.contact_point(pos);
            let dynamic = sus_forces[i] - static_loads[i];
            self.body
                .apply_force_at_point(Vec3::new(0.0, dynamic, 0.0), contact);
        }

        // (5) brakes
        self.brakes.ambient_temp = env.ambient_temp;
        let wheel_speeds = self.wheels.clone().map(|w| w.surface_speed());
        let mut brake_forces = self
            .brakes
            .brake_forces(self.inputs.brake(), wheel_speeds, dt);
        if self.inputs.handbrake() {
            let rear_lock = self.brakes.max_force * 0.5 * 0.35;
            brake_forces[2] = brake_forces[2].max(rear_lock);
            brake_forces[3] = brake_forces[3].max(rear_lock);
        }

        // (6) stability control rides on top
        let esc_inputs = StabilityInputs {
            velocity: self.body.velocity,
            right: self.body.right(),
            yaw_rate: self.body.angular_velocity.y,
            steering: self.inputs.steering(),
            throttle_pedal,
            wheel_slip: self.wheels.clone().map(|w| w.slip_ratio),
            driven: self.driven_wheels(),
        };
        let corrections = self.esc.update(dt, &esc_inputs);
        self.stability_throttle = 1.0 - corrections.throttle_reduction;
        let per_wheel_authority = self.brakes.max_force * 0.25 * ESC_BRAKE_AUTHORITY;
        for i in 0..4 {
            brake_forces[i] =
                (brake_forces[i] + corrections.brake_adjust[i] * per_wheel_authority).max(0.0);
        }
        let throttle_eff = throttle_pedal * self.stability_throttle;

        // (7) tire slip + forces, brake forces opposing motion at each wheel
        let drive_torques = self.drive_torques(throttle_eff);
        self.apply_wheel_forces(dt, env, &brake_forces, &drive_torques);

        // (8) aerodynamics
        let velocity = self.body.velocity;
        self.body.apply_force(self.aero.drag_force(velocity, env.wind));
        let downforce = self.aero.downforce(self.speed());
        let cop_world = self.body.position + self.body.orientation() * self.aero.center_of_pressure;
        self.body
            .apply_force_at_point(Vec3::new(0.0, downforce, 0.0), cop_world);
        self.body.apply_force(self.aero.side_force(
            velocity,
            self.body.forward(),
            self.body.right(),
        ));

        // (9) drivetrain + brake torque spin the wheels (handled inside
        // apply_wheel_forces via the per-wheel torque balance)

        // (10) integration + flat-ground contact
        self.body.integrate(dt);
        if self.body.position.y <= 0.0 {
            self.body.position.y = 0.0;
            if self.body.velocity.y < 0.0 {
                self.body.velocity.y = 0.0;
            }
            self.body.grounded = true;
        } else {
            self.body.grounded = self.body.position.y < 0.02;
        }

        // (11) fuel burn scales with throttle and rpm
        let rpm_fraction = ((self.rpm - self.engine.idle_rpm)
            / (self.engine.redline_rpm - self.engine.idle_rpm))
            .clamp(0.0, 1.0);
        self.fuel = (self.fuel
            - self.engine.fuel_rate * throttle_eff * (0.15 + rpm_fraction) * dt)
            .clamp(0.0, 1.0);

        // (12) crash damage reported by the collision layer
        if self.pending_impact > IMPACT_DAMAGE_SPEED {
            let severity = (self.pending_impact - IMPACT_DAMAGE_SPEED) * 0.02;
            self.damage = (self.damage + severity).clamp(0.0, 1.0);
            debug!(
                "impact at {:.1} m/s, damage now {:.2}",
                self.pending_impact, self.damage
            );
        }
        self.pending_impact = 0.0;
    }

    // ------------------------------------------------------------------
    // step helpers
    // ------------------------------------------------------------------

    /// Speed-sensitive, rate-limited steering rack.
    fn update_steering(&mut self, dt: f32) {
        let speed = self.speed();
        let authority = (1.0 - speed / 40.0).clamp(0.35, 1.0);
        let target = self.inputs.steering() * self.max_steer_angle * authority;
        let step = (target - self.steer_angle).clamp(-MAX_STEER_RATE * dt, MAX_STEER_RATE * dt);
        self.steer_angle = wrap_angle(self.steer_angle + step);
    }

    fn update_engine(&mut self, dt: f32, throttle_pedal: f32) {
        let gear = self.transmission.current_gear();
        let clutch = self.transmission.clutch_engagement() * self.inputs.clutch();

        // drivetrain-side rpm when the clutch is closed and a gear engaged
        let overall = self.transmission.overall_ratio();
        let coupled_rpm = if gear != 0 {
            let driven = self.driven_wheels();
            let mut omega = 0.0;
            let mut count = 0.0;
            for i in 0..4 {
                if driven[i] {
                    omega += self.wheels[i].angular_velocity;
                    count += 1.0;
                }
            }
            if count > 0.0 {
                (omega / count) * overall.abs() * 60.0 / std::f32::consts::TAU
            } else {
                0.0
            }
        } else {
            0.0
        };

        let load = (throttle_pedal * (1.0 - (self.speed() / 70.0).min(1.0))).clamp(0.0, 1.0);
        let free_rpm = self.engine.target_rpm(throttle_pedal, load, gear);
        let coupling = if gear != 0 { clutch } else { 0.0 };
        let target = lerp(free_rpm, coupled_rpm, coupling)
            .clamp(self.engine.idle_rpm, self.engine.redline_rpm);

        self.rpm = smooth(self.rpm, target, 6.0, dt)
            .clamp(self.engine.idle_rpm, self.engine.redline_rpm);
        self.engine.update(dt, self.rpm, throttle_pedal);
    }

    fn wheel_local_offset(&self, pos: WheelPos) -> Vec3 {
        let x = if pos.is_left() { -self.track_width * 0.5 } else { self.track_width * 0.5 };
        let z = if pos.is_front() { self.wheelbase * 0.5 } else { -self.wheelbase * 0.5 };
        Vec3::new(x, 0.0, z)
    }

    fn update_wheel_positions(&mut self) {
        let orientation = self.body.orientation();
        for pos in WHEEL_POSITIONS {
            let world = self.body.position + orientation * self.wheel_local_offset(pos);
            let wheel = &mut self.wheels[pos.index()];
            wheel.world_position = world;
            wheel.contact_normal = Vec3::y();
            wheel.grounded = self.body.grounded;
        }
    }

    /// Contact patch on the ground plane under the wheel.
    fn contact_point(&self, pos: WheelPos) -> Vec3 {
        let mut p = self.wheels[pos.index()].world_position;
        p.y = 0.0;
        p
    }

    fn static_loads(&self) -> [f32; 4] {
        let weight = self.body.mass * GRAVITY;
        let front = weight * self.front_weight_distribution * 0.5;
        let rear = weight * (1.0 - self.front_weight_distribution) * 0.5;
        [front, front, rear, rear]
    }

    /// Static load plus longitudinal and lateral weight transfer.
    fn transferred_loads(&self, static_loads: &[f32; 4]) -> [f32; 4] {
        let mass = self.body.mass;
        let long_transfer =
            self.longitudinal_accel * mass * self.com_height / self.wheelbase;
        let lat_transfer = self.lateral_accel * mass * self.com_height / self.track_width;

        let mut loads = *static_loads;
        for pos in WHEEL_POSITIONS {
            let i = pos.index();
            // accelerating shifts load rearward
            loads[i] += if pos.is_front() { -0.5 * long_transfer } else { 0.5 * long_transfer };
            // lateral acceleration to the right loads the left side
            let axle_share = if pos.is_front() {
                self.front_weight_distribution
            } else {
                1.0 - self.front_weight_distribution
            };
            let side = if pos.is_left() { 0.5 } else { -0.5 };
            loads[i] += side * lat_transfer * axle_share;
            loads[i] = loads[i].max(0.0);
        }
        loads
    }

    fn driven_wheels(&self) -> [bool; 4] {
        match self.drive_type {
            DriveType::Fwd => [true, true, false, false],
            DriveType::Rwd => [false, false, true, true],
            DriveType::Awd => [true, true, true, true],
        }
    }

    /// Per-wheel drive torque after the clutch, gearbox, final drive and
    /// both damage channels.
    fn drive_torques(&self, throttle_eff: f32) -> [f32; 4] {
        let gear = self.transmission.current_gear();
        if gear == 0 {
            return [0.0; 4];
        }
        let clutch = self.transmission.clutch_engagement() * self.inputs.clutch();
        let crank = self.engine.torque_at(self.rpm) * throttle_eff * self.damage_power_multiplier();
        let axle = crank * self.transmission.overall_ratio() * self.transmission.efficiency * clutch;

        let (front_share, rear_share) = match self.drive_type {
            DriveType::Fwd => (1.0, 0.0),
            DriveType::Rwd => (0.0, 1.0),
            DriveType::Awd => (self.awd_front_split, 1.0 - self.awd_front_split),
        };

        let mut torques = [0.0; 4];
        for pos in WHEEL_POSITIONS {
            let share = if pos.is_front() { front_share } else { rear_share };
            torques[pos.index()] = axle * share * 0.5;
        }
        torques
    }

    /// Slip update, tire force application and the per-wheel spin balance.
    fn apply_wheel_forces(
        &mut self,
        dt: f32,
        env: &Environment,
        brake_forces: &[f32; 4],
        drive_torques: &[f32; 4],
    ) {
        let orientation = self.body.orientation();
        let up = Vec3::y();
        let chassis_forward = orientation * Vec3::new(0.0, 0.0, 1.0);
        let chassis_right = orientation * Vec3::new(1.0, 0.0, 0.0);
        let (fl_angle, fr_angle) =
            ackermann_angles(self.steer_angle, self.wheelbase, self.track_width, self.ackermann);
        let loads = self.suspension.forces();

        for pos in WHEEL_POSITIONS {
            let i = pos.index();
            let contact = self.contact_point(pos);

            // wheel basis: steered fronts, chassis-aligned rears
            let steer = match pos {
                WheelPos::Fl => fl_angle,
                WheelPos::Fr => fr_angle,
                _ => 0.0,
            };
            let forward = planar_unit(chassis_forward * steer.cos() + chassis_right * steer.sin());
            let right = up.cross(&forward);

            let point_vel = self.body.point_velocity(contact);
            let v_long = point_vel.dot(&forward);
            let v_lat = point_vel.dot(&right);

            let wheel = &mut self.wheels[i];
            wheel.update_slip(wheel.surface_speed(), v_long, env.ambient_temp, dt);
            wheel.update_slip_angle(v_long, v_lat);

            let tire = wheel.tire_forces(loads[i], env.surface_traction);
            let traction_limit =
                loads[i] * wheel.effective_grip(env.surface_traction) * env.surface_traction;

            // low-speed launch path: below walking pace the slip loop has no
            // signal, so drive force goes straight to the patch
            let direct_blend = (1.0 - v_long.abs() / DIRECT_DRIVE_SPEED).clamp(0.0, 1.0);
            let direct_force = (drive_torques[i] / wheel.radius)
                .clamp(-traction_limit, traction_limit)
                * direct_blend;
            let longitudinal = tire.longitudinal * (1.0 - direct_blend) + direct_force;

            let force = forward * longitudinal + right * tire.lateral;
            self.body.apply_force_at_point(force, contact);

            // brake force opposes the contact-patch motion
            let planar_vel = Vec3::new(point_vel.x, 0.0, point_vel.z);
            let speed = planar_vel.magnitude();
            if speed > 0.1 && brake_forces[i] > 0.0 {
                let braking = brake_forces[i].min(traction_limit);
                self.body
                    .apply_force_at_point(-planar_vel / speed * braking, contact);
            }

            // wheel spin balance: drive accelerates, brakes and the tire's
            // reaction torque decelerate
            let reaction = longitudinal * wheel.radius;
            let brake_torque = brake_forces[i] * wheel.radius * sign_or_zero(wheel.angular_velocity);
            let net = drive_torques[i] - reaction - brake_torque;
            wheel.angular_velocity += net / WHEEL_INERTIA * dt;

            // free rolling pulls the wheel toward ground speed
            if wheel.grounded {
                let target = v_long / wheel.radius;
                wheel.angular_velocity = smooth(wheel.angular_velocity, target, WHEEL_SYNC_RATE, dt);
            }
            wheel.angular_velocity = wheel.angular_velocity.clamp(-320.0, 320.0);
        }
    }

    // ------------------------------------------------------------------
    // telemetry
    // ------------------------------------------------------------------

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            speed_kmh: self.speed_kmh(),
            rpm: self.rpm,
            gear: self.transmission.current_gear(),
            throttle: self.inputs.throttle(),
            brake: self.inputs.brake(),
            steering: self.inputs.steering(),
            brake_temp_front: self.brakes.disc_temp[0],
            brake_temp_rear: self.brakes.disc_temp[1],
            brake_efficiency: self.brakes.efficiency(),
            suspension_travel: self.suspension.travel_fractions(),
            esc_active: self.esc.esc_active,
            tcs_active: self.esc.tcs_active,
            abs_active: self.esc.abs_active,
            tire_temp: [
                self.wheels[0].temperature,
                self.wheels[1].temperature,
                self.wheels[2].temperature,
                self.wheels[3].temperature,
            ],
            tire_wear: [
                self.wheels[0].wear,
                self.wheels[1].wear,
                self.wheels[2].wear,
                self.wheels[3].wear,
            ],
            tire_pressure: [
                self.wheels[0].pressure,
                self.wheels[1].pressure,
                self.wheels[2].pressure,
                self.wheels[3].pressure,
            ],
            lateral_g: self.lateral_accel / GRAVITY,
            longitudinal_g: self.longitudinal_accel / GRAVITY,
            yaw_rate: self.body.angular_velocity.y,
            fuel: self.fuel,
            damage: self.damage,
            engine_temp: self.engine.temperature,
            engine_overheated: self.engine.is_overheated(),
        }
    }
}

// --------------------------------------------------
// Ackermann steering geometry (stateless)
// --------------------------------------------------

/// Left/right front wheel angles for a rack angle `base`, blended between
/// parallel steer and full Ackermann. Positive base steers right, making the
/// right wheel the inner one.
fn ackermann_angles(base: f32, wheelbase: f32, track: f32, blend: f32) -> (f32, f32) {
    if base.abs() < 1e-4 {
        return (0.0, 0.0);
    }

    let sign = base.signum();
    let radius = wheelbase / base.abs().tan();
    let r_inner = (radius - track * 0.5).max(0.01);
    let r_outer = (radius + track * 0.5).max(0.01);

    let inner = (wheelbase / r_inner).atan() * sign;
    let outer = (wheelbase / r_outer).atan() * sign;

    let (full_left, full_right) = if sign > 0.0 { (outer, inner) } else { (inner, outer) };
    (
        lerp(base, full_left, blend),
        lerp(base, full_right, blend),
    )
}

#[inline]
fn planar_unit(v: Vec3) -> Vec3 {
    let flat = Vec3::new(v.x, 0.0, v.z);
    let m = flat.magnitude();
    if m > 1e-6 { flat / m } else { Vec3::new(0.0, 0.0, 1.0) }
}

#[inline]
fn sign_or_zero(v: f32) -> f32 {
    if v.abs() < 1e-3 { 0.0 } else { v.signum() }
}
