//! Core shared types for the tire module (engine-agnostic).

use std::fmt;

// ============================================
// Wheel identification
// ============================================

/// Corner index, always ordered FL/FR/RL/RR in per-wheel arrays.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum WheelPos {
    Fl,
    Fr,
    Rl,
    Rr,
}

pub const WHEEL_POSITIONS: [WheelPos; 4] = [WheelPos::Fl, WheelPos::Fr, WheelPos::Rl, WheelPos::Rr];

impl WheelPos {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            WheelPos::Fl => 0,
            WheelPos::Fr => 1,
            WheelPos::Rl => 2,
            WheelPos::Rr => 3,
        }
    }

    pub fn is_front(self) -> bool {
        matches!(self, WheelPos::Fl | WheelPos::Fr)
    }

    pub fn is_rear(self) -> bool {
        matches!(self, WheelPos::Rl | WheelPos::Rr)
    }

    pub fn is_left(self) -> bool {
        matches!(self, WheelPos::Fl | WheelPos::Rl)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WheelPos::Fl => "FL",
            WheelPos::Fr => "FR",
            WheelPos::Rl => "RL",
            WheelPos::Rr => "RR",
        }
    }
}

impl fmt::Display for WheelPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_fl_fr_rl_rr() {
        for (i, p) in WHEEL_POSITIONS.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
        assert!(WheelPos::Fl.is_front() && WheelPos::Fl.is_left());
        assert!(WheelPos::Rr.is_rear() && !WheelPos::Rr.is_left());
    }
}
