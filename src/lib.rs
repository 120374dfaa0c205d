//! tarmac-physics: real-time vehicle-dynamics simulation core.
//!
//! One [`Car`] per vehicle, advanced with [`Car::update_physics`] at a fixed
//! tick rate (60-120 Hz). Cars are independently owned; the only shared data
//! is the read-only [`Environment`] snapshot handed in each tick, so a grid
//! of vehicles parallelizes across cars without coordination.
//!
//! Rendering, input capture, networking, storage and audio are collaborators
//! on the far side of [`TelemetrySnapshot`]; nothing in this crate blocks,
//! allocates per tick, or talks to the outside world.

pub mod aero;
pub mod brakes;
pub mod car;
pub mod control;
pub mod engine;
pub mod error;
pub mod esc;
pub mod math;
pub mod rigid_body;
pub mod suspension;
pub mod telemetry;
pub mod tire;
pub mod transmission;

pub use car::{Car, CarConfig, DriveType};
pub use control::{ControlInputs, Environment};
pub use error::ConfigError;
pub use esc::DriveMode;
pub use telemetry::TelemetrySnapshot;
pub use tire::{Compound, WheelPos};
pub use transmission::GearboxKind;
