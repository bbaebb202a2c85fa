//! rigkit-mapping-core: symbolic driver-to-rig mapping resolution.
//!
//! Runs at setup time, not per frame: the build-time table names every
//! driver point the system can produce; resolution intersects it with the
//! drivers a session actually owns and hands the resulting relations to the
//! host's rig-application bridge.

pub mod apply;
pub mod resolve;
pub mod table;

pub use apply::{apply_relations, RigBridge};
pub use resolve::{resolve, MappingRelation, Resolution};
pub use table::{
    armature_table, ConstraintKind, Expression, MappingEntry, RelationKind, TargetSpec,
};
