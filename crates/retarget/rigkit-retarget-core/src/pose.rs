//! Torso and limb estimation from pose landmarks.
//!
//! Emits per-landmark driver positions, synthesized shoulder/hip centers, a
//! torso orientation frame, a shoulder rotation isolated from the torso, and
//! per-segment limb lengths as scale drivers. Lengths are re-measured every
//! frame: the detected skeleton's proportions drift with detection noise and
//! the downstream scale drivers compensate explicitly.

use rigkit_api_core::{names, UpdateBatch};

use crate::continuity::{apply_angular_offset, ContinuityCache};
use crate::driver::DriverRegistry;
use crate::error::TrackError;
use crate::inputs::FrameInput;
use crate::landmarks::{pose, LandmarkSet};
use crate::math::{
    center_point, decompose, normalize, orthonormal_frame, plane_normal, Quat,
};

/// Synthesized proxy slots after the detector's 33 landmark slots.
pub const SHOULDER_CENTER_SLOT: u32 = pose::LANDMARK_COUNT;
pub const HIP_CENTER_SLOT: u32 = pose::LANDMARK_COUNT + 1;

/// Angular offset (units of π) correcting the torso frame's rest-pose
/// misalignment. Calibration data; preserved as-is.
const TORSO_ANGULAR_OFFSET: [f64; 3] = [-0.5, 0.0, 0.0];

/// Limb segments measured every frame, (proximal, distal); the length is
/// written as the distal driver's scale.
const LIMB_SEGMENTS: [(u32, u32); 12] = [
    (pose::LEFT_SHOULDER, pose::LEFT_ELBOW),
    (pose::LEFT_ELBOW, pose::LEFT_WRIST),
    (pose::LEFT_WRIST, pose::LEFT_INDEX),
    (pose::RIGHT_SHOULDER, pose::RIGHT_ELBOW),
    (pose::RIGHT_ELBOW, pose::RIGHT_WRIST),
    (pose::RIGHT_WRIST, pose::RIGHT_INDEX),
    (pose::LEFT_HIP, pose::LEFT_KNEE),
    (pose::LEFT_KNEE, pose::LEFT_ANKLE),
    (pose::LEFT_ANKLE, pose::LEFT_FOOT_INDEX),
    (pose::RIGHT_HIP, pose::RIGHT_KNEE),
    (pose::RIGHT_KNEE, pose::RIGHT_ANKLE),
    (pose::RIGHT_ANKLE, pose::RIGHT_FOOT_INDEX),
];

#[derive(Debug)]
pub struct PoseState {
    continuity: ContinuityCache,
    drivers: DriverRegistry,
}

impl Default for PoseState {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseState {
    pub fn new() -> Self {
        let mut drivers = DriverRegistry::new();
        for (slot, name) in [
            (pose::LEFT_SHOULDER, names::SHOULDER_L),
            (pose::RIGHT_SHOULDER, names::SHOULDER_R),
            (pose::LEFT_ELBOW, names::ELBOW_L),
            (pose::RIGHT_ELBOW, names::ELBOW_R),
            (pose::LEFT_WRIST, names::WRIST_L),
            (pose::RIGHT_WRIST, names::WRIST_R),
            (pose::LEFT_HIP, names::HIP_L),
            (pose::RIGHT_HIP, names::HIP_R),
            (pose::LEFT_KNEE, names::KNEE_L),
            (pose::RIGHT_KNEE, names::KNEE_R),
            (pose::LEFT_ANKLE, names::ANKLE_L),
            (pose::RIGHT_ANKLE, names::ANKLE_R),
            (pose::LEFT_FOOT_INDEX, names::FOOT_INDEX_L),
            (pose::RIGHT_FOOT_INDEX, names::FOOT_INDEX_R),
            (SHOULDER_CENTER_SLOT, names::SHOULDER_CENTER),
            (HIP_CENTER_SLOT, names::HIP_CENTER),
        ] {
            drivers.insert(slot, name);
        }
        Self {
            continuity: ContinuityCache::new(),
            drivers,
        }
    }

    pub fn drivers(&self) -> &DriverRegistry {
        &self.drivers
    }

    /// Process one pose frame. Sub-features fail independently.
    pub fn process(&mut self, input: &FrameInput, out: &mut UpdateBatch) {
        let set = LandmarkSet::new(&input.landmarks);

        // Raw landmark proxies: one position per detected pose landmark.
        for landmark in set.raw() {
            if landmark.index < pose::LANDMARK_COUNT {
                if let Ok(p) = set.point(landmark.index) {
                    self.drivers.write_location(landmark.index, p, out);
                }
            }
        }

        if let Err(err) = self.centers_and_torso(&set, out) {
            log::debug!("torso skipped this frame: {err}");
        }
        self.limb_lengths(&set, out);
    }

    fn centers_and_torso(
        &mut self,
        set: &LandmarkSet,
        out: &mut UpdateBatch,
    ) -> Result<(), TrackError> {
        let shoulder_l = set.point(pose::LEFT_SHOULDER)?;
        let shoulder_r = set.point(pose::RIGHT_SHOULDER)?;
        let hip_l = set.point(pose::LEFT_HIP)?;
        let hip_r = set.point(pose::RIGHT_HIP)?;

        let shoulder_center = center_point(shoulder_l, shoulder_r);
        let hip_center = center_point(hip_l, hip_r);
        self.drivers
            .write_location(SHOULDER_CENTER_SLOT, shoulder_center, out);
        self.drivers.write_location(HIP_CENTER_SLOT, hip_center, out);

        // Torso frame: hip line as tangent, the hip/shoulder triangle's
        // normal, and the spine direction fixing the handedness.
        let tangent = normalize(hip_r - hip_center)?;
        let mut normal = plane_normal(&[hip_l, hip_r, shoulder_center])?;
        let mut binormal = tangent.cross(&normal);
        if binormal.dot(&(shoulder_center - hip_center)) < 0.0 {
            normal = -normal;
            binormal = -binormal;
        }
        let (_, rotation, _) = decompose(&orthonormal_frame(tangent, normal, binormal));
        let torso = self.continuity.resolve(&rotation, HIP_CENTER_SLOT, 0);
        self.drivers.write_rotation(
            HIP_CENTER_SLOT,
            apply_angular_offset(torso, TORSO_ANGULAR_OFFSET),
            out,
        );

        // Shoulder rotation relative to the hips, so torso rotation does not
        // leak into it.
        let hip_dir = normalize(hip_r - hip_center)?;
        let shoulder_dir = normalize(shoulder_r - shoulder_center)?;
        let relative = Quat::rotation_between(&hip_dir, &shoulder_dir).unwrap_or_else(|| {
            log::debug!("shoulder line opposes hip line, holding identity");
            Quat::identity()
        });
        let shoulder = self.continuity.resolve(&relative, SHOULDER_CENTER_SLOT, 0);
        self.drivers.write_rotation(SHOULDER_CENTER_SLOT, shoulder, out);
        Ok(())
    }

    fn limb_lengths(&mut self, set: &LandmarkSet, out: &mut UpdateBatch) {
        for &(proximal, distal) in &LIMB_SEGMENTS {
            match (set.point(proximal), set.point(distal)) {
                (Ok(a), Ok(b)) => {
                    self.drivers.write_scale(distal, (b - a).norm(), out);
                }
                (Err(err), _) | (_, Err(err)) => {
                    log::debug!("segment ({proximal}, {distal}) skipped: {err}");
                }
            }
        }
    }
}
