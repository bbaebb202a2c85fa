//! Error taxonomy for per-frame computation.
//!
//! Every variant is local and non-propagating: one feature failing must never
//! abort the other features of the same frame, nor the session. Only
//! `EmptyFrame` (the detector delivered nothing) is surfaced to the external
//! driver.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    /// A normalize/cross input had near-zero magnitude. The affected feature
    /// skips this frame; the host keeps the previous frame's values.
    #[error("degenerate vector (length {length:.3e})")]
    DegenerateVector { length: f64 },

    /// A required landmark index is absent from this frame's set.
    #[error("landmark {index} missing from this frame")]
    MissingLandmark { index: u32 },

    /// The detector delivered a frame with no landmarks at all.
    #[error("frame {frame} carried no landmarks")]
    EmptyFrame { frame: u64 },
}
