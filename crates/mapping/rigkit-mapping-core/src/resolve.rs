//! Resolution of the symbolic table against the drivers actually present.
//!
//! Resolution is a pure function of (table, available drivers): running it
//! twice on an unchanged scene yields the same relation set. Absent drivers
//! are skipped and logged, never errors; a user who has not created every
//! proxy type still gets the rest of the rig driven.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use rigkit_api_core::DriverRef;

use crate::table::{Expression, MappingEntry, RelationKind, TargetSpec};

/// One resolved (source, kind, target, values) tuple, ready for the
/// rig-application bridge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MappingRelation {
    pub source: DriverRef,
    pub kind: RelationKind,
    pub target: TargetSpec,
    pub values: Expression,
}

/// Outcome of one resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub relations: Vec<MappingRelation>,
    /// Driver names the table knows but the scene does not have.
    pub skipped: Vec<String>,
}

/// Resolve `table` against the driver points present in the scene.
///
/// Multi-user rows expand into one relation per target. At most one relation
/// survives per (source, target) pair; later duplicates are dropped.
pub fn resolve(table: &[MappingEntry], available: &[DriverRef]) -> Resolution {
    let by_name: HashMap<&str, &DriverRef> =
        available.iter().map(|d| (d.name.as_str(), d)).collect();

    let mut seen: HashSet<(&str, TargetSpec)> = HashSet::new();
    let mut resolution = Resolution::default();

    for entry in table {
        let Some(&source) = by_name.get(entry.driver) else {
            log::info!("driver {} absent from scene, mapping skipped", entry.driver);
            resolution.skipped.push(entry.driver.to_string());
            continue;
        };
        for target in &entry.targets {
            if !seen.insert((entry.driver, target.clone())) {
                log::debug!(
                    "duplicate relation ({}, {}) dropped",
                    entry.driver,
                    target.object
                );
                continue;
            }
            resolution.relations.push(MappingRelation {
                source: source.clone(),
                kind: entry.kind.clone(),
                target: target.clone(),
                values: entry.values.clone(),
            });
        }
    }
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ConstraintKind;

    fn entry(driver: &'static str, targets: Vec<TargetSpec>) -> MappingEntry {
        MappingEntry {
            driver,
            kind: RelationKind::Constraint(ConstraintKind::CopyRotation),
            targets,
            values: Expression::Direct,
        }
    }

    #[test]
    fn absent_drivers_are_skipped_not_fatal() {
        let table = vec![
            entry("drv_present", vec![TargetSpec::bone("rig", "a")]),
            entry("drv_absent", vec![TargetSpec::bone("rig", "b")]),
        ];
        let available = vec![DriverRef::new("drv_present", 0)];
        let res = resolve(&table, &available);
        assert_eq!(res.relations.len(), 1);
        assert_eq!(res.skipped, vec!["drv_absent".to_string()]);
    }

    #[test]
    fn duplicate_source_target_pairs_collapse() {
        let table = vec![
            entry("drv_a", vec![TargetSpec::bone("rig", "t")]),
            entry("drv_a", vec![TargetSpec::bone("rig", "t")]),
        ];
        let available = vec![DriverRef::new("drv_a", 0)];
        let res = resolve(&table, &available);
        assert_eq!(res.relations.len(), 1);
    }
}
