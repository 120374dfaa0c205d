use serde::{Deserialize, Serialize};

/// Tire compound, resolved once at configuration time.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Wet,
}

impl Compound {
    /// Grip multiplier given the surface traction coefficient. Slicks give
    /// away most of their advantage once the surface drops below ~0.7; the
    /// wet compound works the other way around.
    pub fn grip_multiplier(self, surface_traction: f32) -> f32 {
        let low_grip = surface_traction < 0.7;
        match self {
            Compound::Soft => {
                if low_grip {
                    0.80
                } else {
                    1.12
                }
            }
            Compound::Medium => {
                if low_grip {
                    0.75
                } else {
                    1.0
                }
            }
            Compound::Hard => {
                if low_grip {
                    0.70
                } else {
                    0.90
                }
            }
            Compound::Wet => {
                if low_grip {
                    1.20
                } else {
                    0.85
                }
            }
        }
    }

    /// Wear accumulation multiplier. Softer rubber goes off faster.
    pub fn wear_multiplier(self) -> f32 {
        match self {
            Compound::Soft => 1.4,
            Compound::Medium => 1.0,
            Compound::Hard => 0.7,
            Compound::Wet => 1.1,
        }
    }
}
