//! Input contracts consumed once per frame.
//!
//! The external driver delivers one `FrameInput` per detection cycle. Frame
//! numbers are monotonically non-decreasing (the driver's responsibility).
//! For hand tracking, landmarks arrive as consecutive 21-point groups, one
//! per detected hand, aligned with the handedness list.

use serde::{Deserialize, Serialize};

/// One detected point, in detector-local axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub index: u32,
    pub position: [f64; 3],
}

impl Landmark {
    pub fn new(index: u32, position: [f64; 3]) -> Self {
        Self { index, position }
    }
}

/// Which side a hand landmark group belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handedness {
    /// Group number into the frame's landmark list (group g spans landmarks
    /// [21·g, 21·(g+1))).
    pub group: u32,
    pub is_right: bool,
}

/// Landmarks in one hand group.
pub const HAND_GROUP_LEN: usize = 21;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub frame_number: u64,
    pub landmarks: Vec<Landmark>,
    /// Only meaningful for hand tracking; empty otherwise.
    #[serde(default)]
    pub handedness: Vec<Handedness>,
}

impl FrameInput {
    pub fn new(frame_number: u64, landmarks: Vec<Landmark>) -> Self {
        Self {
            frame_number,
            landmarks,
            handedness: Vec::new(),
        }
    }

    /// Landmarks of hand group `group`, or `None` when the frame is too
    /// short to contain it.
    pub fn hand_group(&self, group: u32) -> Option<&[Landmark]> {
        let start = group as usize * HAND_GROUP_LEN;
        let end = start + HAND_GROUP_LEN;
        self.landmarks.get(start..end)
    }
}
