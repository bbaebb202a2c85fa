//! rigkit-retarget-core (engine-agnostic)
//!
//! Geometric retargeting kernel: converts per-frame landmark sets from an
//! upstream detector into driver-point transforms for a skeletal rig.
//! Detection itself and scene mutation live outside; hosts implement the
//! `KeyframeSink` seam from rigkit-api-core and drive `Session::advance`
//! once per frame.

pub mod config;
pub mod continuity;
pub mod dedup;
pub mod driver;
pub mod error;
pub mod face;
pub mod hand;
pub mod inputs;
pub mod landmarks;
pub mod math;
pub mod pose;
pub mod session;

// Re-exports for consumers (adapters)
pub use config::{Config, ConfigError, DetectionTarget};
pub use continuity::{apply_angular_offset, compatible_euler, euler_xyz, ContinuityCache};
pub use dedup::DuplicateGuard;
pub use driver::{DriverPoint, DriverRegistry};
pub use error::TrackError;
pub use inputs::{FrameInput, Handedness, Landmark};
pub use landmarks::{to_rig, LandmarkSet};
pub use math::{Quat, Vec3};
pub use session::Session;
pub use rigkit_api_core::{Euler, UpdateBatch};
