//! Fail-fast configuration errors.
//!
//! The per-tick hot path never returns `Result`; out-of-range values are
//! clamped where they are assigned. Only construction-time mistakes that
//! indicate a programming error surface here.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("chassis mass must be positive, got {0} kg")]
    NonPositiveMass(f32),

    #[error("gear {0} is outside the configured ratio table ({1} forward gears)")]
    GearOutOfRange(i8, usize),

    #[error("gear ratio table must contain at least one forward gear")]
    EmptyGearTable,

    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,
}
