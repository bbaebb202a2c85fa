//! Per-frame update contracts from the retarget core.
//!
//! An UpdateBatch carries only the slots that changed this frame, split by
//! channel the way the host keyframes them. Adapters apply batches to the
//! scene and own persistence; the core only fills and reuses them.

use serde::{Deserialize, Serialize};

use crate::euler::Euler;

/// One driver-point location for this frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub slot: u32,
    pub location: [f64; 3],
}

/// One driver-point rotation for this frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationUpdate {
    pub slot: u32,
    pub rotation: Euler,
}

/// One driver-point scale for this frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleUpdate {
    pub slot: u32,
    pub scale: [f64; 3],
}

/// Everything the core computed for one frame. A duplicate frame leaves the
/// batch empty; absent slots mean "unchanged", never "zero".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBatch {
    #[serde(default)]
    pub positions: Vec<PositionUpdate>,
    #[serde(default)]
    pub rotations: Vec<RotationUpdate>,
    #[serde(default)]
    pub scales: Vec<ScaleUpdate>,
}

impl UpdateBatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.positions.clear();
        self.rotations.clear();
        self.scales.clear();
    }

    #[inline]
    pub fn push_position(&mut self, slot: u32, location: [f64; 3]) {
        self.positions.push(PositionUpdate { slot, location });
    }

    #[inline]
    pub fn push_rotation(&mut self, slot: u32, rotation: Euler) {
        self.rotations.push(RotationUpdate { slot, rotation });
    }

    #[inline]
    pub fn push_scale(&mut self, slot: u32, scale: [f64; 3]) {
        self.scales.push(ScaleUpdate { slot, scale });
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.rotations.is_empty() && self.scales.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len() + self.rotations.len() + self.scales.len()
    }

    /// Merge another batch in-place (append).
    pub fn append(&mut self, mut other: UpdateBatch) {
        self.positions.append(&mut other.positions);
        self.rotations.append(&mut other.rotations);
        self.scales.append(&mut other.scales);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_roundtrip_json() {
        let mut b = UpdateBatch::new();
        b.push_position(3, [0.1, 0.2, 0.3]);
        b.push_rotation(3, Euler::new(0.0, 1.5, 0.0));
        b.push_scale(7, [1.0, 1.0, 1.0]);
        let s = serde_json::to_string(&b).unwrap();
        let parsed: UpdateBatch = serde_json::from_str(&s).unwrap();
        assert_eq!(b, parsed);
    }

    #[test]
    fn clear_and_append() {
        let mut a = UpdateBatch::new();
        a.push_position(0, [0.0; 3]);
        let mut b = UpdateBatch::new();
        b.push_scale(1, [2.0; 3]);
        a.append(b);
        assert_eq!(a.len(), 2);
        a.clear();
        assert!(a.is_empty());
    }
}
