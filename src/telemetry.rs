//! Per-tick telemetry snapshot, the only handoff to HUD, upload and replay.

use serde::Serialize;

/// Everything downstream consumers get to see, assembled once per tick.
/// Per-wheel arrays are ordered FL/FR/RL/RR.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot {
    pub speed_kmh: f32,
    pub rpm: f32,
    pub gear: i8,

    // input echoes
    pub throttle: f32,
    pub brake: f32,
    pub steering: f32,

    pub brake_temp_front: f32, // C
    pub brake_temp_rear: f32,  // C
    pub brake_efficiency: f32,

    pub suspension_travel: [f32; 4], // fraction of range

    pub esc_active: bool,
    pub tcs_active: bool,
    pub abs_active: bool,

    pub tire_temp: [f32; 4],     // C
    pub tire_wear: [f32; 4],     // 0..1
    pub tire_pressure: [f32; 4], // bar

    pub lateral_g: f32,
    pub longitudinal_g: f32,
    pub yaw_rate: f32, // rad/s

    pub fuel: f32,   // 0..1
    pub damage: f32, // 0..1
    pub engine_temp: f32,
    pub engine_overheated: bool,
}
