//! Seam between the core and the host's keyframing bridge.
//!
//! Hosts implement `KeyframeSink` and receive one batch per processed frame.
//! The core calls it synchronously from the frame loop, never from another
//! thread.

use crate::updates::UpdateBatch;

pub trait KeyframeSink {
    /// Apply one frame's worth of updates at the given frame number.
    fn apply(&mut self, frame_number: u64, batch: &UpdateBatch);
}

/// Sink that records everything it receives. Useful in tests and as a
/// reference implementation for adapters.
#[derive(Default, Debug)]
pub struct RecordingSink {
    pub frames: Vec<(u64, UpdateBatch)>,
}

impl KeyframeSink for RecordingSink {
    fn apply(&mut self, frame_number: u64, batch: &UpdateBatch) {
        self.frames.push((frame_number, batch.clone()));
    }
}
