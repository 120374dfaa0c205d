// ==============================================================================
// transmission.rs — GEARBOX SHIFT STATE MACHINE + AUTO-SHIFT LOGIC
// ------------------------------------------------------------------------------
// Two states: Idle and Shifting(progress in [0,1)). While a shift runs, the
// clutch ramps out over the first half of the shift time and back in over the
// second half; the reported gear flips to the target only when the shift
// completes. CVT boxes shift instantly and never open the clutch.
//
// Automatic boxes pick their own shifts each step: the upshift threshold
// drops as throttle rises, the downshift threshold climbs with throttle, and
// a kickdown is allowed only when the post-shift rpm stays under the redline.
// ==============================================================================

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearboxKind {
    Manual,
    Automatic,
    Cvt,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ShiftState {
    Idle,
    Shifting { target: i8, progress: f32 },
}

#[derive(Debug, Clone)]
pub struct Transmission {
    ratios: Vec<f32>,  // forward gears, index 0 = 1st
    reverse_ratio: f32,
    pub final_drive: f32,
    pub efficiency: f32, // (0, 1]
    pub shift_time: f32, // s
    pub kind: GearboxKind,

    current_gear: i8, // -1 reverse, 0 neutral, 1..=N forward
    state: ShiftState,
    clutch: f32, // engagement, 0 = open, 1 = locked
}

impl Transmission {
    pub fn new(
        ratios: Vec<f32>,
        reverse_ratio: f32,
        final_drive: f32,
        kind: GearboxKind,
    ) -> Result<Self, ConfigError> {
        if ratios.is_empty() {
            return Err(ConfigError::EmptyGearTable);
        }
        Ok(Self {
            ratios,
            reverse_ratio: reverse_ratio.clamp(1.0, 6.0),
            final_drive: final_drive.clamp(2.0, 6.5),
            efficiency: 0.9,
            shift_time: 0.30,
            kind,
            current_gear: 0,
            state: ShiftState::Idle,
            clutch: 1.0,
        })
    }

    #[inline]
    pub fn gear_count(&self) -> usize {
        self.ratios.len()
    }

    /// Gear reported to the rest of the car. Does not change mid-shift.
    #[inline]
    pub fn current_gear(&self) -> i8 {
        self.current_gear
    }

    #[inline]
    pub fn is_shifting(&self) -> bool {
        matches!(self.state, ShiftState::Shifting { .. })
    }

    #[inline]
    pub fn clutch_engagement(&self) -> f32 {
        self.clutch
    }

    /// Ratio table lookup with a configuration-time bounds check.
    pub fn ratio_for(&self, gear: i8) -> Result<f32, ConfigError> {
        match gear {
            -1 => Ok(-self.reverse_ratio),
            0 => Ok(0.0),
            g if g >= 1 && (g as usize) <= self.ratios.len() => Ok(self.ratios[g as usize - 1]),
            g => Err(ConfigError::GearOutOfRange(g, self.ratios.len())),
        }
    }

    /// Ratio of the engaged gear. The current gear is always inside the
    /// table, so this cannot fail after construction.
    #[inline]
    pub fn current_ratio(&self) -> f32 {
        match self.current_gear {
            -1 => -self.reverse_ratio,
            0 => 0.0,
            g => self.ratios[g as usize - 1],
        }
    }

    /// Overall drive ratio including the final drive.
    #[inline]
    pub fn overall_ratio(&self) -> f32 {
        self.current_ratio() * self.final_drive
    }

    /// Begin a shift. No-op when already shifting or when the target equals
    /// the current gear; targets outside the table are clamped. Returns
    /// whether a shift was started (or, for CVT, completed).
    pub fn start_shift(&mut self, gear: i8) -> bool {
        if self.is_shifting() {
            return false;
        }
        let target = gear.clamp(-1, self.ratios.len() as i8);
        if target == self.current_gear {
            return false;
        }

        if self.kind == GearboxKind::Cvt {
            self.current_gear = target;
            self.clutch = 1.0;
            return true;
        }

        self.state = ShiftState::Shifting {
            target,
            progress: 0.0,
        };
        true
    }

    pub fn shift_up(&mut self) -> bool {
        self.start_shift(self.current_gear + 1)
    }

    pub fn shift_down(&mut self) -> bool {
        self.start_shift(self.current_gear - 1)
    }

    /// Advance the shift state machine and, for automatics, run the shift
    /// decision logic. `redline_rpm`/`shift_rpm` come from the engine.
    pub fn update(&mut self, dt: f32, rpm: f32, throttle: f32, shift_rpm: f32, redline_rpm: f32) {
        if let ShiftState::Shifting { target, progress } = self.state {
            let progress = progress + dt / self.shift_time.max(1e-3);

            // clutch out over the first half, back in over the second
            let ramp = if progress < 0.5 {
                1.0 - progress * 2.0
            } else {
                (progress - 0.5) * 2.0
            };
            self.clutch = ramp.clamp(0.0, 1.0);

            if progress >= 1.0 {
                self.current_gear = target;
                self.state = ShiftState::Idle;
                self.clutch = 1.0;
            } else {
                self.state = ShiftState::Shifting { target, progress };
            }
            return;
        }

        if self.kind == GearboxKind::Automatic {
            self.auto_shift(rpm, throttle.clamp(0.0, 1.0), shift_rpm, redline_rpm);
        }
    }

    fn auto_shift(&mut self, rpm: f32, throttle: f32, shift_rpm: f32, redline_rpm: f32) {
        if self.current_gear < 1 {
            return; // never auto-shift out of neutral/reverse
        }

        let up_threshold = shift_rpm * (1.0 - 0.12 * throttle);
        let down_threshold = (shift_rpm * 0.35) * (1.0 + 0.6 * throttle);

        if rpm > up_threshold && (self.current_gear as usize) < self.ratios.len() {
            self.start_shift(self.current_gear + 1);
            return;
        }

        if self.current_gear > 1 && rpm < down_threshold {
            // kickdown guard: only drop a gear if the engine would survive it
            let rpm_after = rpm * self.ratio_after_downshift() / self.current_ratio();
            if rpm_after < redline_rpm * 0.95 {
                self.start_shift(self.current_gear - 1);
            }
        }
    }

    #[inline]
    fn ratio_after_downshift(&self) -> f32 {
        self.ratios[(self.current_gear - 2) as usize]
    }
}
