//! tire - engine-agnostic tire model (pure types + per-wheel state)

pub mod compound;
pub mod model;
pub mod types;

pub use compound::Compound;
pub use model::{TireForces, Wheel};
pub use types::*;
