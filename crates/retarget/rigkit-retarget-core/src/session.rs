//! Session: all mutable state for one active detection target.
//!
//! One session per detection target, constructed at setup, dropped when
//! detection stops. The external driver calls `advance` once per detected
//! frame; the call runs to completion before the next frame arrives. A
//! frame is either fully computed and emitted or fully discarded by the
//! duplicate guard, so cancellation needs no rollback.

use rigkit_api_core::{DriverRef, KeyframeSink, UpdateBatch};

use crate::config::{Config, DetectionTarget};
use crate::dedup::DuplicateGuard;
use crate::error::TrackError;
use crate::face::FaceState;
use crate::hand::HandState;
use crate::inputs::FrameInput;
use crate::pose::PoseState;

#[derive(Debug)]
enum TargetState {
    Hand(HandState),
    Pose(PoseState),
    Face(FaceState),
}

#[derive(Debug)]
pub struct Session {
    cfg: Config,
    guard: DuplicateGuard,
    state: TargetState,
    // Reused per-frame output buffer.
    outputs: UpdateBatch,
}

impl Session {
    pub fn new(cfg: Config) -> Self {
        let state = match cfg.target {
            DetectionTarget::Hand => TargetState::Hand(HandState::new()),
            DetectionTarget::Pose => TargetState::Pose(PoseState::new()),
            DetectionTarget::Face => TargetState::Face(FaceState::new()),
        };
        Self {
            cfg,
            guard: DuplicateGuard::new(),
            state,
            outputs: UpdateBatch::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Driver points this session owns, for mapping resolution at setup.
    pub fn driver_refs(&self) -> Vec<DriverRef> {
        match &self.state {
            TargetState::Hand(s) => s.drivers().refs(),
            TargetState::Pose(s) => s.drivers().refs(),
            TargetState::Face(s) => s.drivers().refs(),
        }
    }

    /// Process one frame. Returns the (possibly empty) batch of updates; a
    /// duplicate frame yields an empty batch. Only a detector-level failure
    /// (no landmarks delivered at all) surfaces as an error.
    pub fn advance(&mut self, input: &FrameInput) -> Result<&UpdateBatch, TrackError> {
        self.outputs.clear();
        if input.landmarks.is_empty() {
            return Err(TrackError::EmptyFrame {
                frame: input.frame_number,
            });
        }
        if self.guard.check(&input.landmarks) {
            return Ok(&self.outputs);
        }
        match &mut self.state {
            TargetState::Hand(s) => s.process(input, &mut self.outputs),
            TargetState::Pose(s) => s.process(input, &mut self.outputs),
            TargetState::Face(s) => s.process(input, &mut self.outputs),
        }
        Ok(&self.outputs)
    }

    /// `advance`, then hand a non-empty batch to the keyframing bridge at
    /// the configured key step.
    pub fn advance_into(
        &mut self,
        input: &FrameInput,
        sink: &mut dyn KeyframeSink,
    ) -> Result<(), TrackError> {
        let key = input.frame_number.saturating_mul(self.cfg.key_step as u64);
        let batch = self.advance(input)?;
        if !batch.is_empty() {
            sink.apply(key, batch);
        }
        Ok(())
    }
}
