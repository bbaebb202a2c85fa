//! rigkit-api-core: shared motion-update and driver-point contracts (core, engine-agnostic)

pub mod driver;
pub mod euler;
pub mod sink;
pub mod updates;

pub use driver::{names, DriverRef};
pub use euler::Euler;
pub use sink::KeyframeSink;
pub use updates::{PositionUpdate, RotationUpdate, ScaleUpdate, UpdateBatch};
