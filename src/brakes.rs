// ==============================================================================
// brakes.rs — PER-AXLE DISC THERMAL MODEL + ABS / EBD / BRAKE ASSIST
// ------------------------------------------------------------------------------
// brake_forces(pedal, wheel_speeds, dt):
// 1) axle base force = max_force * bias (front) or 1-bias (rear) * pedal
// 2) fade multiplier from disc temperature (1.0 below onset, pow-law decay
//    above, floored), then pad-wear derating
// 3) ABS: any wheel sliding relative to the fleet average gets released
// 4) EBD: rear axle scaled back when the rears rotate slower than the fronts
// 5) disc heating proportional to dissipated force, Newton cooling toward
//    ambient (ventilated discs cool twice as fast), pad wear accumulation
//
// Emergency assist: a hard, fast pedal stab is treated as a full-force stop.
// Pedal at zero always returns exactly zero force on all four wheels.
// ==============================================================================

use crate::math::smooth;
use crate::tire::WHEEL_POSITIONS;

const FADE_FLOOR: f32 = 0.2;
const PAD_WEAR_DERATE: f32 = 0.3;
const ABS_RELEASE: f32 = 0.65; // force multiplier on a slipping wheel
const EBD_REAR_FLOOR: f32 = 0.5;
const EBD_SPEED_RATIO: f32 = 0.90; // rear/front speed ratio that triggers EBD
const PAD_HOT_TEMP: f32 = 300.0; // C, wear accelerates above this
const EBA_PEDAL: f32 = 0.85;
const EBA_RISE: f32 = 3.5; // pedal units per s

const FRONT: usize = 0;
const REAR: usize = 1;

#[derive(Debug, Clone)]
pub struct BrakeSystem {
    pub disc_diameter: [f32; 2], // m, front/rear
    pub disc_thickness: [f32; 2], // m
    pub ventilated: [bool; 2],
    pub disc_temp: [f32; 2], // C
    pub pad_wear: [f32; 2],  // 0..1

    pub bias: f32,      // front share of total force
    pub max_force: f32, // N, total at full pedal

    pub abs_enabled: bool,
    pub ebd_enabled: bool,
    pub eba_enabled: bool,
    pub abs_slip_threshold: f32, // slip vs fleet average

    pub fade_onset: f32, // C
    pub fade_max: f32,   // C, where the pow-law ratio reaches 1
    pub ambient_temp: f32,
    pub airflow_cooling: f32, // extra cooling rate per (m/s)

    last_pedal: f32,
    assist_latched: bool,
}

impl BrakeSystem {
    pub fn new(max_force: f32, bias: f32) -> Self {
        Self {
            disc_diameter: [0.33, 0.30],
            disc_thickness: [0.028, 0.022],
            ventilated: [true, false],
            disc_temp: [20.0, 20.0],
            pad_wear: [0.0, 0.0],
            bias: bias.clamp(0.4, 0.8),
            max_force: max_force.clamp(4_000.0, 60_000.0),
            abs_enabled: true,
            ebd_enabled: true,
            eba_enabled: true,
            abs_slip_threshold: 0.12,
            fade_onset: 400.0,
            fade_max: 800.0,
            ambient_temp: 20.0,
            airflow_cooling: 0.004,
            last_pedal: 0.0,
            assist_latched: false,
        }
    }

    /// Fade multiplier for one axle: full force below the onset temperature,
    /// then a pow-1.5 decay down to a floor.
    fn fade_multiplier(&self, axle: usize) -> f32 {
        let temp = self.disc_temp[axle];
        if temp <= self.fade_onset {
            return 1.0;
        }
        let ratio = ((temp - self.fade_onset) / (self.fade_max - self.fade_onset)).clamp(0.0, 1.0);
        (1.0 - ratio.powf(1.5) * 0.8).max(FADE_FLOOR)
    }

    fn axle_multiplier(&self, axle: usize) -> f32 {
        self.fade_multiplier(axle) * (1.0 - self.pad_wear[axle] * PAD_WEAR_DERATE)
    }

    /// Overall system health for telemetry, 1.0 when cold and fresh.
    pub fn efficiency(&self) -> f32 {
        0.5 * (self.axle_multiplier(FRONT) + self.axle_multiplier(REAR))
    }

    /// Per-wheel brake forces (FL/FR/RL/RR) plus the thermal/wear update.
    pub fn brake_forces(&mut self, pedal: f32, wheel_speeds: [f32; 4], dt: f32) -> [f32; 4] {
        let mut pedal = pedal.clamp(0.0, 1.0);

        // emergency assist: a hard stab latches full force until release
        if self.eba_enabled {
            let rise = (pedal - self.last_pedal) / dt.max(1e-4);
            if pedal >= EBA_PEDAL && rise > EBA_RISE {
                self.assist_latched = true;
            }
            if pedal < 0.3 {
                self.assist_latched = false;
            }
            if self.assist_latched {
                pedal = 1.0;
            }
        }
        self.last_pedal = pedal;

        let mut forces = [0.0f32; 4];
        if pedal > 0.0 {
            let front_force = self.max_force * self.bias * pedal * 0.5 * self.axle_multiplier(FRONT);
            let rear_force =
                self.max_force * (1.0 - self.bias) * pedal * 0.5 * self.axle_multiplier(REAR);

            for pos in WHEEL_POSITIONS {
                forces[pos.index()] = if pos.is_front() { front_force } else { rear_force };
            }

            if self.abs_enabled {
                self.apply_abs(&mut forces, wheel_speeds);
            }
            if self.ebd_enabled {
                self.apply_ebd(&mut forces, wheel_speeds);
            }
        }

        self.update_thermals(&forces, wheel_speeds, dt);
        forces
    }

    /// Release any wheel turning notably slower than the fleet average.
    fn apply_abs(&self, forces: &mut [f32; 4], wheel_speeds: [f32; 4]) {
        let avg = wheel_speeds.iter().sum::<f32>() / 4.0;
        if avg.abs() < 1.0 {
            return;
        }
        for i in 0..4 {
            let slip = (wheel_speeds[i] - avg) / avg.abs();
            if slip < -self.abs_slip_threshold {
                forces[i] *= ABS_RELEASE;
            }
        }
    }

    /// Keep the rear axle from locking before the front.
    fn apply_ebd(&self, forces: &mut [f32; 4], wheel_speeds: [f32; 4]) {
        let front_avg = 0.5 * (wheel_speeds[0] + wheel_speeds[1]);
        let rear_avg = 0.5 * (wheel_speeds[2] + wheel_speeds[3]);
        if front_avg < 1.0 {
            return; // not moving
        }
        let ratio = rear_avg / front_avg;
        if ratio < EBD_SPEED_RATIO {
            let scale = (ratio / EBD_SPEED_RATIO).max(EBD_REAR_FLOOR);
            forces[2] *= scale;
            forces[3] *= scale;
        }
    }

    fn update_thermals(&mut self, forces: &[f32; 4], wheel_speeds: [f32; 4], dt: f32) {
        let axle_force = [forces[0] + forces[1], forces[2] + forces[3]];
        let speed = wheel_speeds.iter().map(|s| s.abs()).sum::<f32>() / 4.0;

        for axle in [FRONT, REAR] {
            // thermal mass grows with disc size; bigger discs heat slower
            let thermal_mass =
                (self.disc_diameter[axle] * self.disc_thickness[axle] * 80_000.0).max(100.0);
            self.disc_temp[axle] += axle_force[axle] / thermal_mass * dt * 18.0;

            let mut cool_rate = 0.08 + self.airflow_cooling * speed;
            if self.ventilated[axle] {
                cool_rate *= 2.0;
            }
            self.disc_temp[axle] = smooth(self.disc_temp[axle], self.ambient_temp, cool_rate, dt);

            let mut wear_rate = axle_force[axle] * 1.2e-7;
            if self.disc_temp[axle] > PAD_HOT_TEMP {
                wear_rate *= 2.0;
            }
            self.pad_wear[axle] = (self.pad_wear[axle] + wear_rate * dt).clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brakes() -> BrakeSystem {
        BrakeSystem::new(24_000.0, 0.62)
    }

    const ROLLING: [f32; 4] = [25.0, 25.0, 25.0, 25.0];

    #[test]
    fn zero_pedal_means_zero_force_regardless_of_state() {
        let mut b = brakes();
        b.disc_temp = [600.0, 550.0];
        b.pad_wear = [0.8, 0.9];
        assert_eq!(b.brake_forces(0.0, ROLLING, 0.01), [0.0; 4]);
    }

    #[test]
    fn bias_splits_front_and_rear() {
        let mut b = brakes();
        b.abs_enabled = false;
        b.ebd_enabled = false;
        b.eba_enabled = false;
        let f = b.brake_forces(1.0, ROLLING, 0.01);
        assert!(f[0] > f[2]);
        assert_eq!(f[0], f[1]);
        assert_eq!(f[2], f[3]);
    }

    #[test]
    fn fade_reduces_force_when_hot() {
        let mut hot = brakes();
        hot.eba_enabled = false;
        let mut cold = hot.clone();
        hot.disc_temp = [700.0, 700.0];
        let fh = hot.brake_forces(0.5, ROLLING, 0.01);
        let fc = cold.brake_forces(0.5, ROLLING, 0.01);
        assert!(fh[0] < fc[0]);
        assert!(fh[2] < fc[2]);
        // and never below the floor
        assert!(fh[0] >= fc[0] * FADE_FLOOR * 0.99);
    }

    #[test]
    fn abs_releases_a_locking_wheel() {
        let mut with_abs = brakes();
        with_abs.eba_enabled = false;
        with_abs.ebd_enabled = false;
        let mut without = with_abs.clone();
        without.abs_enabled = false;

        // front-left well below the fleet average
        let speeds = [12.0, 25.0, 25.0, 25.0];
        let fa = with_abs.brake_forces(1.0, speeds, 0.01);
        let fn_ = without.brake_forces(1.0, speeds, 0.01);
        assert!(fa[0] < fn_[0]);
        assert_eq!(fa[1], fn_[1]);
    }

    #[test]
    fn ebd_relieves_a_slow_rear_axle() {
        let mut b = brakes();
        b.eba_enabled = false;
        b.abs_enabled = false;
        let speeds = [25.0, 25.0, 18.0, 18.0];
        let f = b.brake_forces(1.0, speeds, 0.01);
        let baseline = b.max_force * (1.0 - b.bias) * 0.5 * b.axle_multiplier(REAR);
        assert!(f[2] < baseline);
        assert!(f[2] >= baseline * EBD_REAR_FLOOR * 0.99);
    }

    #[test]
    fn sustained_braking_heats_discs_then_cooling_wins() {
        let mut b = brakes();
        b.eba_enabled = false;
        let mut last = b.disc_temp;
        for _ in 0..100 {
            b.brake_forces(1.0, ROLLING, 0.01);
            assert!(b.disc_temp[FRONT] >= last[FRONT] - 1e-3);
            assert!(b.disc_temp[REAR] >= last[REAR] - 1e-3);
            last = b.disc_temp;
        }
        assert!(b.disc_temp[FRONT] > 100.0);

        // pedal released: temperatures fall toward ambient
        let peak = b.disc_temp[FRONT];
        for _ in 0..600 {
            b.brake_forces(0.0, ROLLING, 0.01);
        }
        assert!(b.disc_temp[FRONT] < peak);
    }

    #[test]
    fn hard_stab_latches_full_force() {
        let mut b = brakes();
        b.abs_enabled = false;
        b.ebd_enabled = false;
        // squeeze on gradually: no assist, force tracks the pedal
        let mut gentle = [0.0f32; 4];
        for step in 1..=90 {
            gentle = b.brake_forces(step as f32 * 0.01, ROLLING, 0.01);
        }
        let mut stab = brakes();
        stab.abs_enabled = false;
        stab.ebd_enabled = false;
        stab.brake_forces(0.0, ROLLING, 0.01);
        let f = stab.brake_forces(0.9, ROLLING, 0.01); // 0 -> 0.9 in one tick
        assert!(f[0] > gentle[0] * 0.99);
        // follow-up partial pedal stays maximized while latched
        let follow = stab.brake_forces(0.6, ROLLING, 0.01);
        assert!(follow[0] >= f[0] * 0.9);
    }

    #[test]
    fn pad_wear_accumulates_under_use() {
        let mut b = brakes();
        b.eba_enabled = false;
        for _ in 0..500 {
            b.brake_forces(1.0, ROLLING, 0.01);
        }
        assert!(b.pad_wear[FRONT] > 0.0);
        assert!(b.efficiency() < 1.0);
    }
}
