//! Application ordering over the host's rig bridge.
//!
//! The bridge itself belongs to the host; the ordering invariant belongs
//! here: re-running setup must not stack constraints, so any pre-existing
//! attachment of the same kind at the same target is removed before the new
//! one is added.

use crate::resolve::MappingRelation;
use crate::table::{ConstraintKind, RelationKind, TargetSpec};

/// Implemented by the host's rig-application layer.
pub trait RigBridge {
    fn remove_constraint(&mut self, target: &TargetSpec, constraint: ConstraintKind);
    fn add_constraint(&mut self, relation: &MappingRelation, constraint: ConstraintKind);
    fn set_prop_driver(&mut self, relation: &MappingRelation);
}

/// Apply every relation in order, removing stale constraints first.
pub fn apply_relations(bridge: &mut dyn RigBridge, relations: &[MappingRelation]) {
    for relation in relations {
        match &relation.kind {
            RelationKind::Constraint(constraint) => {
                bridge.remove_constraint(&relation.target, *constraint);
                bridge.add_constraint(relation, *constraint);
            }
            RelationKind::SingleProp { .. } | RelationKind::BoneProp { .. } => {
                bridge.set_prop_driver(relation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Expression;
    use rigkit_api_core::DriverRef;

    #[derive(Default)]
    struct ScriptedBridge {
        calls: Vec<String>,
    }

    impl RigBridge for ScriptedBridge {
        fn remove_constraint(&mut self, target: &TargetSpec, _constraint: ConstraintKind) {
            self.calls.push(format!("remove:{}", target.object));
        }
        fn add_constraint(&mut self, relation: &MappingRelation, _constraint: ConstraintKind) {
            self.calls.push(format!("add:{}", relation.target.object));
        }
        fn set_prop_driver(&mut self, relation: &MappingRelation) {
            self.calls.push(format!("prop:{}", relation.target.object));
        }
    }

    #[test]
    fn constraints_remove_before_add() {
        let relation = MappingRelation {
            source: DriverRef::new("drv_head", 0),
            kind: RelationKind::Constraint(ConstraintKind::CopyRotation),
            target: TargetSpec::bone("rig", "head"),
            values: Expression::Direct,
        };
        let mut bridge = ScriptedBridge::default();
        apply_relations(&mut bridge, &[relation]);
        assert_eq!(bridge.calls, vec!["remove:rig", "add:rig"]);
    }
}
