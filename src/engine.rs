// ==============================================================================
// engine.rs — TORQUE/POWER CURVES, THERMAL STATE, TURBO, DAMAGE
// ------------------------------------------------------------------------------
// The torque and power curves are sampled once over the idle..redline range
// and resampled only when the limits change; the per-tick lookup is a nearest
// sample. On top of the raw curve every torque request composes:
//   turbo boost * damage multiplier * temperature multiplier
// Temperature and boost pressure are smoothed, never snapped. Sustained
// running above 120 C converts into a permanent damage-multiplier decay.
// ==============================================================================

use crate::math::{lerp, smooth};

const CURVE_SAMPLES: usize = 64;
const OPTIMAL_TEMP_LOW: f32 = 90.0; // C
const OPTIMAL_TEMP_HIGH: f32 = 100.0; // C
const TEMP_PENALTY_FLOOR: f32 = 0.5;
const OVERHEAT_TEMP: f32 = 120.0; // C
const OVERHEAT_GRACE: f32 = 2.0; // s above the limit before damage starts
const OVERHEAT_DECAY: f32 = 0.01; // damage multiplier lost per s
const TURBO_BOOST_GAIN: f32 = 0.35; // torque gain at full boost

#[derive(Debug, Clone)]
pub struct Engine {
    pub max_power: f32,  // W
    pub max_torque: f32, // Nm
    pub idle_rpm: f32,
    pub redline_rpm: f32,
    pub shift_rpm: f32,

    pub fuel_rate: f32,          // fraction of tank per s at full load
    pub damage_multiplier: f32,  // 0..1, permanent
    pub temperature: f32,        // C
    pub turbo: bool,
    pub boost_pressure: f32, // 0..1, smoothed

    torque_curve: Vec<f32>, // Nm, idle..redline
    power_curve: Vec<f32>,  // W, idle..redline
    overheat_timer: f32,
}

impl Engine {
    pub fn new(max_power: f32, max_torque: f32, idle_rpm: f32, redline_rpm: f32) -> Self {
        let idle = idle_rpm.clamp(400.0, 3000.0);
        let redline = redline_rpm.clamp(idle + 1000.0, 20000.0);
        let mut engine = Self {
            max_power: max_power.clamp(20e3, 1200e3),
            max_torque: max_torque.clamp(50.0, 2000.0),
            idle_rpm: idle,
            redline_rpm: redline,
            shift_rpm: redline * 0.92,
            fuel_rate: 0.0035,
            damage_multiplier: 1.0,
            temperature: 70.0,
            turbo: false,
            boost_pressure: 0.0,
            torque_curve: Vec::new(),
            power_curve: Vec::new(),
            overheat_timer: 0.0,
        };
        engine.rebuild_curves();
        engine
    }

    /// Resample the torque/power curves. Called from the constructor and
    /// whenever max power/torque or the redline changes.
    pub fn rebuild_curves(&mut self) {
        self.torque_curve.clear();
        self.power_curve.clear();
        for i in 0..CURVE_SAMPLES {
            let x = i as f32 / (CURVE_SAMPLES - 1) as f32; // 0..1 over idle..redline
            self.torque_curve.push(self.max_torque * rise_fall(x, 0.40));
            self.power_curve.push(self.max_power * rise_fall(x, 0.75));
        }
    }

    #[inline]
    fn sample(&self, curve: &[f32], rpm: f32) -> f32 {
        if rpm < self.idle_rpm || rpm > self.redline_rpm || curve.is_empty() {
            return 0.0;
        }
        let x = (rpm - self.idle_rpm) / (self.redline_rpm - self.idle_rpm);
        let i = (x * (curve.len() - 1) as f32).round() as usize;
        curve[i.min(curve.len() - 1)]
    }

    fn condition_multiplier(&self) -> f32 {
        let boost = if self.turbo {
            1.0 + self.boost_pressure * TURBO_BOOST_GAIN
        } else {
            1.0
        };
        boost * self.damage_multiplier * self.temperature_multiplier()
    }

    /// 1.0 inside the 90..100 C window, linear penalty outside, floored.
    pub fn temperature_multiplier(&self) -> f32 {
        let distance = if self.temperature < OPTIMAL_TEMP_LOW {
            OPTIMAL_TEMP_LOW - self.temperature
        } else if self.temperature > OPTIMAL_TEMP_HIGH {
            self.temperature - OPTIMAL_TEMP_HIGH
        } else {
            return 1.0;
        };
        (1.0 - distance / 100.0).max(TEMP_PENALTY_FLOOR)
    }

    /// Crank torque at the given rpm, zero outside [idle, redline].
    pub fn torque_at(&self, rpm: f32) -> f32 {
        self.sample(&self.torque_curve, rpm) * self.condition_multiplier()
    }

    /// Crank power at the given rpm, zero outside [idle, redline].
    pub fn power_at(&self, rpm: f32) -> f32 {
        self.sample(&self.power_curve, rpm) * self.condition_multiplier()
    }

    /// Where the engine wants to settle for the current throttle, drivetrain
    /// load (0..1) and gear. Higher gears pull the target down a little, load
    /// pushes it up.
    pub fn target_rpm(&self, throttle: f32, load: f32, gear: i8) -> f32 {
        let throttle = throttle.clamp(0.0, 1.0);
        let base = lerp(self.idle_rpm, self.redline_rpm, throttle);
        let load_adjust = 1.0 + load.clamp(0.0, 1.0) * 0.08;
        let gear_adjust = 1.0 - (gear.max(0) as f32) * 0.015;
        (base * load_adjust * gear_adjust).clamp(self.idle_rpm, self.redline_rpm)
    }

    /// Thermal + boost integration, and the overheat-to-damage path.
    pub fn update(&mut self, dt: f32, rpm: f32, throttle: f32) {
        let throttle = throttle.clamp(0.0, 1.0);
        let rpm_fraction = ((rpm - self.idle_rpm) / (self.redline_rpm - self.idle_rpm)).clamp(0.0, 1.0);

        let target_temp = 82.0 + throttle * 28.0 + rpm_fraction * 14.0;
        self.temperature = smooth(self.temperature, target_temp, 0.12, dt);

        let target_boost = if self.turbo {
            throttle * rpm_fraction.sqrt()
        } else {
            0.0
        };
        self.boost_pressure = smooth(self.boost_pressure, target_boost, 2.5, dt).clamp(0.0, 1.0);

        if self.temperature > OVERHEAT_TEMP {
            self.overheat_timer += dt;
            if self.overheat_timer > OVERHEAT_GRACE {
                self.damage_multiplier =
                    (self.damage_multiplier - OVERHEAT_DECAY * dt).clamp(0.0, 1.0);
            }
        } else {
            self.overheat_timer = 0.0;
        }
    }

    pub fn is_overheated(&self) -> bool {
        self.temperature > OVERHEAT_TEMP
    }
}

/// Rise-then-fall multiplier over x in [0, 1] peaking at `peak`.
/// Rises from 0.55 to 1.0, falls back to 0.35 at the redline end.
fn rise_fall(x: f32, peak: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    if x <= peak {
        lerp(0.55, 1.0, x / peak)
    } else {
        lerp(1.0, 0.35, (x - peak) / (1.0 - peak))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(147e3, 205.0, 900.0, 7400.0)
    }

    #[test]
    fn curves_are_zero_outside_operating_range() {
        let e = engine();
        assert_eq!(e.torque_at(0.0), 0.0);
        assert_eq!(e.torque_at(e.idle_rpm - 1.0), 0.0);
        assert_eq!(e.torque_at(e.redline_rpm + 1.0), 0.0);
        assert_eq!(e.power_at(50_000.0), 0.0);
    }

    #[test]
    fn curves_are_non_negative_inside_operating_range() {
        let e = engine();
        let mut rpm = e.idle_rpm;
        while rpm <= e.redline_rpm {
            assert!(e.torque_at(rpm) >= 0.0);
            assert!(e.power_at(rpm) >= 0.0);
            rpm += 100.0;
        }
    }

    #[test]
    fn torque_peaks_before_power() {
        let e = engine();
        let peak_of = |f: &dyn Fn(f32) -> f32| {
            let mut best = (e.idle_rpm, 0.0f32);
            let mut rpm = e.idle_rpm;
            while rpm <= e.redline_rpm {
                if f(rpm) > best.1 {
                    best = (rpm, f(rpm));
                }
                rpm += 25.0;
            }
            best.0
        };
        let torque_peak = peak_of(&|r| e.torque_at(r));
        let power_peak = peak_of(&|r| e.power_at(r));
        assert!(torque_peak < power_peak);
    }

    #[test]
    fn cold_and_hot_engines_lose_torque() {
        let mut e = engine();
        e.temperature = 95.0;
        let warm = e.torque_at(4000.0);
        e.temperature = 20.0;
        assert!(e.torque_at(4000.0) < warm);
        e.temperature = 130.0;
        assert!(e.torque_at(4000.0) < warm);
        e.temperature = 500.0;
        assert!(e.torque_at(4000.0) >= warm * TEMP_PENALTY_FLOOR * 0.99);
    }

    #[test]
    fn sustained_overheat_decays_damage_multiplier() {
        let mut e = engine();
        e.temperature = 130.0;
        for _ in 0..1000 {
            // keep feeding heat so cooling never pulls it below the limit
            e.temperature = 130.0;
            e.update(0.01, 6000.0, 1.0);
        }
        assert!(e.damage_multiplier < 1.0);
    }

    #[test]
    fn brief_overheat_is_forgiven() {
        let mut e = engine();
        e.temperature = 125.0;
        e.update(0.5, 4000.0, 0.5);
        assert_eq!(e.damage_multiplier, 1.0);
    }

    #[test]
    fn turbo_adds_torque_once_spooled() {
        let mut na = engine();
        na.temperature = 95.0;
        let mut turbo = na.clone();
        turbo.turbo = true;
        turbo.boost_pressure = 1.0;
        assert!(turbo.torque_at(5000.0) > na.torque_at(5000.0));
    }

    #[test]
    fn target_rpm_stays_in_band() {
        let e = engine();
        for throttle in [0.0, 0.3, 1.0] {
            for gear in [-1i8, 0, 1, 6] {
                let rpm = e.target_rpm(throttle, 0.5, gear);
                assert!(rpm >= e.idle_rpm && rpm <= e.redline_rpm);
            }
        }
    }
}
