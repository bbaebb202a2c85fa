//! Driver-point references and canonical driver names.
//!
//! A driver point is a synthesized proxy the host scene keeps one object per.
//! The retarget core addresses them by dense slot; the mapping core addresses
//! them by canonical name. Both sides share this module so the symbolic table
//! and the session's driver registry can never drift apart.

use serde::{Deserialize, Serialize};

/// Reference to a driver point as seen by the mapping layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverRef {
    pub name: String,
    pub slot: u32,
}

impl DriverRef {
    pub fn new(name: impl Into<String>, slot: u32) -> Self {
        Self {
            name: name.into(),
            slot,
        }
    }
}

/// Canonical driver-point names.
///
/// Hand joint names are listed little-endian per finger (base joint first) in
/// the detector's finger order: thumb, index, middle, ring, pinky.
pub mod names {
    // Pose
    pub const SHOULDER_CENTER: &str = "drv_shoulder_center";
    pub const HIP_CENTER: &str = "drv_hip_center";
    pub const SHOULDER_L: &str = "drv_shoulder.L";
    pub const SHOULDER_R: &str = "drv_shoulder.R";
    pub const ELBOW_L: &str = "drv_elbow.L";
    pub const ELBOW_R: &str = "drv_elbow.R";
    pub const WRIST_L: &str = "drv_wrist.L";
    pub const WRIST_R: &str = "drv_wrist.R";
    pub const HIP_L: &str = "drv_hip.L";
    pub const HIP_R: &str = "drv_hip.R";
    pub const KNEE_L: &str = "drv_knee.L";
    pub const KNEE_R: &str = "drv_knee.R";
    pub const ANKLE_L: &str = "drv_ankle.L";
    pub const ANKLE_R: &str = "drv_ankle.R";
    pub const FOOT_INDEX_L: &str = "drv_foot_index.L";
    pub const FOOT_INDEX_R: &str = "drv_foot_index.R";

    // Face
    pub const HEAD: &str = "drv_head";
    pub const CHIN: &str = "drv_chin";
    pub const MOUTH: &str = "drv_mouth";
    pub const MOUTH_CORNER_L: &str = "drv_mouth_corner.L";
    pub const MOUTH_CORNER_R: &str = "drv_mouth_corner.R";
    pub const EYEBROW_L: &str = "drv_eyebrow.L";
    pub const EYEBROW_R: &str = "drv_eyebrow.R";
    pub const EYELID_L: &str = "drv_eyelid.L";
    pub const EYELID_R: &str = "drv_eyelid.R";

    // Hands: global orientation plus one name per tracked finger joint.
    pub const HAND_L: &str = "drv_hand.L";
    pub const HAND_R: &str = "drv_hand.R";

    pub const FINGER_JOINTS_L: [&str; 15] = [
        "drv_thumb_cmc.L",
        "drv_thumb_mcp.L",
        "drv_thumb_ip.L",
        "drv_index_mcp.L",
        "drv_index_pip.L",
        "drv_index_dip.L",
        "drv_middle_mcp.L",
        "drv_middle_pip.L",
        "drv_middle_dip.L",
        "drv_ring_mcp.L",
        "drv_ring_pip.L",
        "drv_ring_dip.L",
        "drv_pinky_mcp.L",
        "drv_pinky_pip.L",
        "drv_pinky_dip.L",
    ];

    pub const FINGER_JOINTS_R: [&str; 15] = [
        "drv_thumb_cmc.R",
        "drv_thumb_mcp.R",
        "drv_thumb_ip.R",
        "drv_index_mcp.R",
        "drv_index_pip.R",
        "drv_index_dip.R",
        "drv_middle_mcp.R",
        "drv_middle_pip.R",
        "drv_middle_dip.R",
        "drv_ring_mcp.R",
        "drv_ring_pip.R",
        "drv_ring_dip.R",
        "drv_pinky_mcp.R",
        "drv_pinky_pip.R",
        "drv_pinky_dip.R",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finger_tables_are_side_mirrors() {
        for (l, r) in names::FINGER_JOINTS_L
            .iter()
            .zip(names::FINGER_JOINTS_R.iter())
        {
            assert_eq!(l.trim_end_matches(".L"), r.trim_end_matches(".R"));
        }
    }

    #[test]
    fn driver_ref_roundtrip() {
        let d = DriverRef::new(names::HAND_R, 100);
        let s = serde_json::to_string(&d).unwrap();
        assert_eq!(serde_json::from_str::<DriverRef>(&s).unwrap(), d);
    }
}
