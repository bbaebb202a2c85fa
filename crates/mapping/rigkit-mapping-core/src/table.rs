//! Build-time symbolic mapping table.
//!
//! One row per driver-point name, enumerating the rig target(s) that driver
//! feeds and how. Rows whose driver is absent from the scene at setup are
//! skipped during resolution; partial rigs are expected. Multi-user rows
//! (one source, several targets) expand into one relation per target.

use serde::{Deserialize, Serialize};

use rigkit_api_core::names;

/// What a resolved relation attaches at its target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RelationKind {
    /// Rig constraint copying a channel from the source driver.
    Constraint(ConstraintKind),
    /// Property on a scene object, driven directly.
    SingleProp { prop: String },
    /// Property on an armature bone.
    BoneProp { prop: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    CopyLocation,
    CopyRotation,
    CopyScale,
}

/// Where a relation lands in the host rig.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSpec {
    pub object: String,
    pub bone: Option<String>,
}

impl TargetSpec {
    pub fn object(object: &str) -> Self {
        Self {
            object: object.to_string(),
            bone: None,
        }
    }

    pub fn bone(object: &str, bone: &str) -> Self {
        Self {
            object: object.to_string(),
            bone: Some(bone.to_string()),
        }
    }
}

/// How the source channel maps onto the target channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Expression {
    /// Copy through unchanged.
    Direct,
    /// Multiply by a constant factor.
    Scaled { factor: f64 },
    /// Linear remap from a source range to a target range.
    Remap { from: [f64; 2], to: [f64; 2] },
}

/// One symbolic table row.
#[derive(Clone, Debug, PartialEq)]
pub struct MappingEntry {
    pub driver: &'static str,
    pub kind: RelationKind,
    pub targets: Vec<TargetSpec>,
    pub values: Expression,
}

impl MappingEntry {
    fn constraint(
        driver: &'static str,
        constraint: ConstraintKind,
        target: TargetSpec,
    ) -> Self {
        Self {
            driver,
            kind: RelationKind::Constraint(constraint),
            targets: vec![target],
            values: Expression::Direct,
        }
    }

    fn bone_prop(
        driver: &'static str,
        prop: &str,
        targets: Vec<TargetSpec>,
        values: Expression,
    ) -> Self {
        Self {
            driver,
            kind: RelationKind::BoneProp {
                prop: prop.to_string(),
            },
            targets,
            values,
        }
    }
}

const RIG: &str = "rig";

/// The armature mapping table. Rows are grouped by feature module; the
/// multi-user rows fan one measured length out to every IK segment it
/// stretches.
pub fn armature_table() -> Vec<MappingEntry> {
    use ConstraintKind::*;

    let mut rows = vec![
        // Torso / pose
        MappingEntry::constraint(names::HIP_CENTER, CopyRotation, TargetSpec::bone(RIG, "torso")),
        MappingEntry::constraint(
            names::SHOULDER_CENTER,
            CopyRotation,
            TargetSpec::bone(RIG, "chest"),
        ),
        MappingEntry::constraint(names::WRIST_L, CopyLocation, TargetSpec::bone(RIG, "hand_ik.L")),
        MappingEntry::constraint(names::WRIST_R, CopyLocation, TargetSpec::bone(RIG, "hand_ik.R")),
        MappingEntry::constraint(names::ANKLE_L, CopyLocation, TargetSpec::bone(RIG, "foot_ik.L")),
        MappingEntry::constraint(names::ANKLE_R, CopyLocation, TargetSpec::bone(RIG, "foot_ik.R")),
        // Arm stretch: one measured length feeds the whole IK chain.
        MappingEntry::bone_prop(
            names::ELBOW_L,
            "stretch",
            vec![
                TargetSpec::bone(RIG, "upper_arm_ik.L"),
                TargetSpec::bone(RIG, "forearm_ik.L"),
                TargetSpec::bone(RIG, "hand_ik.L"),
            ],
            Expression::Scaled { factor: 1.0 },
        ),
        MappingEntry::bone_prop(
            names::ELBOW_R,
            "stretch",
            vec![
                TargetSpec::bone(RIG, "upper_arm_ik.R"),
                TargetSpec::bone(RIG, "forearm_ik.R"),
                TargetSpec::bone(RIG, "hand_ik.R"),
            ],
            Expression::Scaled { factor: 1.0 },
        ),
        // Hands
        MappingEntry::constraint(names::HAND_L, CopyRotation, TargetSpec::bone(RIG, "hand_ik.L")),
        MappingEntry::constraint(names::HAND_R, CopyRotation, TargetSpec::bone(RIG, "hand_ik.R")),
        // Face
        MappingEntry::constraint(names::HEAD, CopyRotation, TargetSpec::bone(RIG, "head")),
        MappingEntry::constraint(names::CHIN, CopyRotation, TargetSpec::bone(RIG, "jaw_master")),
        MappingEntry::bone_prop(
            names::EYELID_L,
            "lid_follow",
            vec![TargetSpec::bone(RIG, "lid.T.L")],
            Expression::Remap {
                from: [0.0, 0.35],
                to: [0.0, 1.0],
            },
        ),
        MappingEntry::bone_prop(
            names::EYELID_R,
            "lid_follow",
            vec![TargetSpec::bone(RIG, "lid.T.R")],
            Expression::Remap {
                from: [0.0, 0.35],
                to: [0.0, 1.0],
            },
        ),
        MappingEntry::bone_prop(
            names::EYEBROW_L,
            "brow_raise",
            vec![TargetSpec::bone(RIG, "brow.T.L")],
            Expression::Remap {
                from: [0.1, 0.45],
                to: [0.0, 1.0],
            },
        ),
        MappingEntry::bone_prop(
            names::EYEBROW_R,
            "brow_raise",
            vec![TargetSpec::bone(RIG, "brow.T.R")],
            Expression::Remap {
                from: [0.1, 0.45],
                to: [0.0, 1.0],
            },
        ),
        MappingEntry::bone_prop(
            names::MOUTH,
            "jaw_open",
            vec![TargetSpec::bone(RIG, "jaw_master")],
            Expression::Remap {
                from: [0.0, 0.6],
                to: [0.0, 1.0],
            },
        ),
        MappingEntry::constraint(
            names::MOUTH_CORNER_L,
            CopyRotation,
            TargetSpec::bone(RIG, "lip_end.L.001"),
        ),
        MappingEntry::constraint(
            names::MOUTH_CORNER_R,
            CopyRotation,
            TargetSpec::bone(RIG, "lip_end.R.001"),
        ),
    ];

    // Finger joints: every tracked joint copies its rotation onto the
    // matching finger bone.
    for (joints, suffix) in [
        (&names::FINGER_JOINTS_L, "L"),
        (&names::FINGER_JOINTS_R, "R"),
    ] {
        let bones = ["thumb", "f_index", "f_middle", "f_ring", "f_pinky"];
        for (i, &driver) in joints.iter().enumerate() {
            let bone = format!("{}.{:02}.{}", bones[i / 3], i % 3 + 1, suffix);
            rows.push(MappingEntry::constraint(
                driver,
                ConstraintKind::CopyRotation,
                TargetSpec::bone(RIG, &bone),
            ));
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_no_duplicate_rows() {
        let table = armature_table();
        for (i, a) in table.iter().enumerate() {
            for b in table.iter().skip(i + 1) {
                assert!(
                    !(a.driver == b.driver && a.targets == b.targets),
                    "duplicate row for {}",
                    a.driver
                );
            }
        }
    }

    #[test]
    fn finger_rows_cover_both_sides() {
        let table = armature_table();
        let fingers = table
            .iter()
            .filter(|e| e.driver.starts_with("drv_") && e.driver.contains("_mcp"))
            .count();
        // 5 mcp/cmc-adjacent joints per side appear among 30 finger rows.
        assert!(fingers >= 8);
        assert_eq!(table.iter().filter(|e| e.driver.contains("thumb")).count(), 6);
    }
}
