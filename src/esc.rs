// ==============================================================================
// esc.rs — ELECTRONIC STABILITY / TRACTION / ANTI-LOCK CONTROL
// ==============================================================================
// Runs once per tick on top of the raw physics, never inside it. Inputs are
// the body velocity, yaw rate, steering input and the four wheel slip ratios;
// outputs are per-wheel brake adjustments plus a throttle reduction that the
// orchestrator composes into the torque request.
//
// Detection, each step:
// - oversteer:   rear slip average exceeds front by more than a threshold
// - understeer:  front slip average exceeds rear by more than a threshold
// - yaw:         |yaw rate| beyond the configured limit
// - rollover:    lateral acceleration beyond 6 g
// Interventions are additive and clamped. A brake adjustment is a signed
// fraction: positive asks the orchestrator for extra brake force on that
// wheel, negative releases pressure the driver is applying.
//
// The drive-mode selector scales how hard the system steps in. Off is a real
// bypass: detection still wants running state cleared, so update() zeroes
// every output and flag without reading the inputs.
// ==============================================================================

use serde::{Deserialize, Serialize};

use crate::math::{Vec3, GRAVITY};
use crate::tire::WheelPos;

const ROLLOVER_LATERAL_G: f32 = 6.0;
const MAX_BRAKE_ADJUST: f32 = 1.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveMode {
    Comfort,
    Sport,
    Track,
    Off,
}

impl DriveMode {
    /// Scale on intervention strength. Off never reaches the intervention
    /// path at all; the value here is irrelevant but kept at zero anyway.
    fn intervention_scale(self) -> f32 {
        match self {
            DriveMode::Comfort => 1.0,
            DriveMode::Sport => 0.7,
            DriveMode::Track => 0.4,
            DriveMode::Off => 0.0,
        }
    }
}

/// Per-tick sensor view handed in by the orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct StabilityInputs {
    pub velocity: Vec3,
    pub right: Vec3, // chassis right axis, world space
    pub yaw_rate: f32, // rad/s
    pub steering: f32, // -1..1
    pub throttle_pedal: f32,
    pub wheel_slip: [f32; 4],
    pub driven: [bool; 4],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StabilityOutputs {
    /// Signed per-wheel brake adjustment, -1..1 of the brake authority.
    pub brake_adjust: [f32; 4],
    /// 0..1 cut applied to the driver's throttle.
    pub throttle_reduction: f32,
}

#[derive(Debug, Clone)]
pub struct StabilityControl {
    pub mode: DriveMode,
    pub esc_enabled: bool,
    pub tcs_enabled: bool,
    pub abs_enabled: bool,
    pub rollover_enabled: bool,

    pub aggressiveness: f32, // 0..1

    pub oversteer_threshold: f32, // slip delta rear-front
    pub understeer_threshold: f32,
    pub yaw_rate_threshold: f32, // rad/s
    pub tcs_slip_threshold: f32,
    pub abs_lock_threshold: f32,

    // transient detection state, refreshed every update
    pub oversteer_detected: bool,
    pub understeer_detected: bool,
    pub yaw_excessive: bool,
    pub rollover_risk: bool,
    pub esc_active: bool,
    pub tcs_active: bool,
    pub abs_active: bool,

    pub activation_count: u32,

    outputs: StabilityOutputs,
    prev_velocity: Vec3,
    lateral_accel: f32, // m/s^2, along chassis right
}

impl StabilityControl {
    pub fn new(mode: DriveMode) -> Self {
        Self {
            mode,
            esc_enabled: true,
            tcs_enabled: true,
            abs_enabled: true,
            rollover_enabled: true,
            aggressiveness: 0.8,
            oversteer_threshold: 0.12,
            understeer_threshold: 0.15,
            yaw_rate_threshold: 1.1,
            tcs_slip_threshold: 0.20,
            abs_lock_threshold: 0.25,
            oversteer_detected: false,
            understeer_detected: false,
            yaw_excessive: false,
            rollover_risk: false,
            esc_active: false,
            tcs_active: false,
            abs_active: false,
            activation_count: 0,
            outputs: StabilityOutputs::default(),
            prev_velocity: Vec3::zeros(),
            lateral_accel: 0.0,
        }
    }

    pub fn set_aggressiveness(&mut self, value: f32) {
        self.aggressiveness = value.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn outputs(&self) -> StabilityOutputs {
        self.outputs
    }

    #[inline]
    pub fn lateral_accel(&self) -> f32 {
        self.lateral_accel
    }

    fn clear(&mut self) {
        self.oversteer_detected = false;
        self.understeer_detected = false;
        self.yaw_excessive = false;
        self.rollover_risk = false;
        self.esc_active = false;
        self.tcs_active = false;
        self.abs_active = false;
        self.outputs = StabilityOutputs::default();
    }

    pub fn update(&mut self, dt: f32, inputs: &StabilityInputs) -> StabilityOutputs {
        if self.mode == DriveMode::Off {
            // full bypass, not a minimized intervention
            self.clear();
            self.prev_velocity = inputs.velocity;
            self.lateral_accel = 0.0;
            return self.outputs;
        }

        self.clear();

        // lateral acceleration from the velocity delta
        let accel = (inputs.velocity - self.prev_velocity) / dt.max(1e-4);
        self.prev_velocity = inputs.velocity;
        self.lateral_accel = accel.dot(&inputs.right);

        let front_slip = 0.5 * (inputs.wheel_slip[0].abs() + inputs.wheel_slip[1].abs());
        let rear_slip = 0.5 * (inputs.wheel_slip[2].abs() + inputs.wheel_slip[3].abs());

        self.oversteer_detected = rear_slip - front_slip > self.oversteer_threshold;
        self.understeer_detected = front_slip - rear_slip > self.understeer_threshold;
        self.yaw_excessive = inputs.yaw_rate.abs() > self.yaw_rate_threshold;
        self.rollover_risk =
            self.rollover_enabled && self.lateral_accel.abs() > ROLLOVER_LATERAL_G * GRAVITY;

        let strength = self.aggressiveness * self.mode.intervention_scale();
        let mut adjust = [0.0f32; 4];
        let mut throttle_cut = 0.0f32;

        if self.esc_enabled {
            if self.oversteer_detected {
                // brake the outer front wheel, chosen by yaw direction
                // (positive yaw = rotating right, so the outer front is FL)
                let outer = if inputs.yaw_rate > 0.0 { WheelPos::Fl } else { WheelPos::Fr };
                adjust[outer.index()] += 0.5 * strength;
                throttle_cut += 0.35 * strength;
            }
            if self.understeer_detected {
                // brake the inner rear to pull the nose back in
                let inner = if inputs.steering >= 0.0 { WheelPos::Rr } else { WheelPos::Rl };
                adjust[inner.index()] += 0.4 * strength;
                throttle_cut += 0.15 * strength;
            }
            if self.yaw_excessive {
                // drag the side opposing the spin: rotating right, brake left
                let (a, b) = if inputs.yaw_rate > 0.0 {
                    (WheelPos::Fl, WheelPos::Rl)
                } else {
                    (WheelPos::Fr, WheelPos::Rr)
                };
                adjust[a.index()] += 0.3 * strength;
                adjust[b.index()] += 0.3 * strength;
                throttle_cut += 0.2 * strength;
            }
        }

        if self.tcs_enabled {
            for i in 0..4 {
                let slip = inputs.wheel_slip[i];
                if slip > self.tcs_slip_threshold {
                    self.tcs_active = true;
                    adjust[i] += (slip - self.tcs_slip_threshold) * 1.5 * strength;
                    if inputs.driven[i] && inputs.throttle_pedal > 0.05 {
                        throttle_cut += (slip - self.tcs_slip_threshold) * 0.8 * strength;
                    }
                }
            }
        }

        if self.abs_enabled {
            for i in 0..4 {
                if inputs.wheel_slip[i] < -self.abs_lock_threshold {
                    self.abs_active = true;
                    adjust[i] -= 0.5 * strength;
                }
            }
        }

        if self.rollover_risk {
            throttle_cut = 1.0;
            for a in adjust.iter_mut() {
                *a += 0.6 * strength;
            }
        }

        self.esc_active = self.oversteer_detected
            || self.understeer_detected
            || self.yaw_excessive
            || self.rollover_risk;
        if self.esc_active || self.tcs_active || self.abs_active {
            self.activation_count = self.activation_count.saturating_add(1);
        }

        for a in adjust.iter_mut() {
            *a = a.clamp(-MAX_BRAKE_ADJUST, MAX_BRAKE_ADJUST);
        }

        self.outputs = StabilityOutputs {
            brake_adjust: adjust,
            throttle_reduction: throttle_cut.clamp(0.0, 1.0),
        };
        self.outputs
    }
}
