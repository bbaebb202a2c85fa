//! Face feature extraction.
//!
//! The raw face mesh has no stable origin, so every frame is first
//! re-centered on a pivot approximated from two temple landmark pairs. On
//! top of that: a head orientation frame, a chin rotation, and normalized
//! 2-point distances for lids, brows and mouth emitted as scale drivers.

use std::f64::consts::FRAC_PI_2;

use rigkit_api_core::{names, Euler, UpdateBatch};

use crate::continuity::{apply_angular_offset, ContinuityCache};
use crate::driver::DriverRegistry;
use crate::error::TrackError;
use crate::inputs::FrameInput;
use crate::landmarks::{face, LandmarkSet};
use crate::math::{angle_between, center_point, decompose, normalize, orthonormal_frame, Vec3};

pub const HEAD_SLOT: u32 = 0;
pub const CHIN_SLOT: u32 = 1;
pub const MOUTH_SLOT: u32 = 2;
pub const MOUTH_CORNER_L_SLOT: u32 = 3;
pub const MOUTH_CORNER_R_SLOT: u32 = 4;
pub const EYEBROW_L_SLOT: u32 = 5;
pub const EYEBROW_R_SLOT: u32 = 6;
pub const EYELID_L_SLOT: u32 = 7;
pub const EYELID_R_SLOT: u32 = 8;

/// Chin rotation tuning, recovered empirically against the detector's output
/// distribution; preserved as-is. The offset is in units of π.
const CHIN_ROTATION_SCALE: f64 = 1.8;
const CHIN_ANGULAR_OFFSET: [f64; 3] = [-0.25, 0.0, 0.0];

/// Head frame rest correction, units of π. Calibration data.
const HEAD_ANGULAR_OFFSET: [f64; 3] = [0.5, 0.0, 0.0];

#[derive(Debug)]
pub struct FaceState {
    continuity: ContinuityCache,
    drivers: DriverRegistry,
}

impl Default for FaceState {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceState {
    pub fn new() -> Self {
        let mut drivers = DriverRegistry::new();
        for (slot, name) in [
            (HEAD_SLOT, names::HEAD),
            (CHIN_SLOT, names::CHIN),
            (MOUTH_SLOT, names::MOUTH),
            (MOUTH_CORNER_L_SLOT, names::MOUTH_CORNER_L),
            (MOUTH_CORNER_R_SLOT, names::MOUTH_CORNER_R),
            (EYEBROW_L_SLOT, names::EYEBROW_L),
            (EYEBROW_R_SLOT, names::EYEBROW_R),
            (EYELID_L_SLOT, names::EYELID_L),
            (EYELID_R_SLOT, names::EYELID_R),
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

    /// Process one face frame. Sub-features fail independently.
    pub fn process(&mut self, input: &FrameInput, out: &mut UpdateBatch) {
        let set = LandmarkSet::new(&input.landmarks);

        let origin = match pivot_origin(&set) {
            Ok(origin) => origin,
            Err(err) => {
                log::debug!("face pivot unavailable, frame skipped: {err}");
                return;
            }
        };
        self.drivers.write_location(HEAD_SLOT, origin, out);

        if let Err(err) = self.head_rotation(&set, origin, out) {
            log::debug!("head rotation skipped: {err}");
        }
        if let Err(err) = self.chin_rotation(&set, origin, out) {
            log::debug!("chin rotation skipped: {err}");
        }
        match interocular_distance(&set) {
            Ok(reference) => {
                self.distance_features(&set, reference, out);
                if let Err(err) = self.mouth_corners(&set, out) {
                    log::debug!("mouth corners skipped: {err}");
                }
            }
            Err(err) => log::debug!("interocular reference unavailable: {err}"),
        }
    }

    fn head_rotation(
        &mut self,
        set: &LandmarkSet,
        origin: Vec3,
        out: &mut UpdateBatch,
    ) -> Result<(), TrackError> {
        let right_temple = center_point(
            set.point(face::TEMPLE_OUTER_R)?,
            set.point(face::TEMPLE_INNER_R)?,
        ) - origin;
        let nose_forward = center_point(
            set.point(face::NOSE_TIP)?,
            set.point(face::NOSE_BASE)?,
        ) - origin;
        let chin = set.point(face::CHIN)? - origin;

        let tangent = normalize(right_temple)?;
        let mut binormal = normalize(chin - tangent * chin.dot(&tangent))?;
        let mut normal = binormal.cross(&tangent);
        // The nose direction only fixes the frame's facing; flipping both
        // axes keeps the basis right-handed.
        if normal.dot(&nose_forward) < 0.0 {
            normal = -normal;
            binormal = -binormal;
        }

        let (_, rotation, _) = decompose(&orthonormal_frame(tangent, normal, binormal));
        let euler = self.continuity.resolve(&rotation, HEAD_SLOT, 0);
        self.drivers.write_rotation(
            HEAD_SLOT,
            apply_angular_offset(euler, HEAD_ANGULAR_OFFSET),
            out,
        );
        Ok(())
    }

    /// Jaw opening: the angle between the nose and chin directions anchored
    /// at the nose bridge, lateral (x) component ignored.
    fn chin_rotation(
        &mut self,
        set: &LandmarkSet,
        origin: Vec3,
        out: &mut UpdateBatch,
    ) -> Result<(), TrackError> {
        let bridge = set.point(face::NOSE_BRIDGE)? - origin;
        let mut nose_dir = (set.point(face::NOSE_TIP)? - origin) - bridge;
        let mut chin_dir = (set.point(face::CHIN)? - origin) - bridge;
        nose_dir.x = 0.0;
        chin_dir.x = 0.0;

        let angle = angle_between(nose_dir, chin_dir)? * CHIN_ROTATION_SCALE;
        let euler = apply_angular_offset(Euler::new(angle, 0.0, 0.0), CHIN_ANGULAR_OFFSET);
        self.drivers.write_rotation(CHIN_SLOT, euler, out);
        Ok(())
    }

    fn distance_features(&mut self, set: &LandmarkSet, reference: f64, out: &mut UpdateBatch) {
        let features = [
            (EYELID_L_SLOT, face::EYELID_TOP_L, face::EYELID_BOTTOM_L),
            (EYELID_R_SLOT, face::EYELID_TOP_R, face::EYELID_BOTTOM_R),
            (EYEBROW_L_SLOT, face::EYEBROW_L, face::EYELID_TOP_L),
            (EYEBROW_R_SLOT, face::EYEBROW_R, face::EYELID_TOP_R),
            (MOUTH_SLOT, face::LIP_TOP, face::LIP_BOTTOM),
        ];
        for (slot, a, b) in features {
            match (set.point(a), set.point(b)) {
                (Ok(pa), Ok(pb)) => {
                    self.drivers.write_scale(slot, (pa - pb).norm() / reference, out);
                }
                (Err(err), _) | (_, Err(err)) => {
                    log::debug!("distance feature at slot {slot} skipped: {err}");
                }
            }
        }
    }

    /// Mouth corner lift relative to horizontal, one angle per corner. The
    /// sign test against the corner midpoint guards upside-down capture rigs.
    fn mouth_corners(&mut self, set: &LandmarkSet, out: &mut UpdateBatch) -> Result<(), TrackError> {
        let mouth_center = center_point(set.point(face::LIP_TOP)?, set.point(face::LIP_BOTTOM)?);
        let corner_l = set.point(face::MOUTH_CORNER_L)?;
        let corner_r = set.point(face::MOUTH_CORNER_R)?;
        let corner_center = center_point(corner_l, corner_r);
        // Rig-space up is +z; an upside-down capture rig inverts the
        // relation between the lip midpoint and the corner midpoint.
        let sign = if mouth_center.z >= corner_center.z {
            1.0
        } else {
            -1.0
        };

        for (slot, corner) in [
            (MOUTH_CORNER_L_SLOT, corner_l),
            (MOUTH_CORNER_R_SLOT, corner_r),
        ] {
            let lift = FRAC_PI_2 - angle_between(corner - mouth_center, Vec3::z())?;
            self.drivers
                .write_rotation(slot, Euler::new(lift * sign, 0.0, 0.0), out);
        }
        Ok(())
    }
}

/// Pivot origin: midpoint of the two temple landmark pairs. All further face
/// computation is relative to it.
pub fn pivot_origin(set: &LandmarkSet) -> Result<Vec3, TrackError> {
    let outer = center_point(
        set.point(face::TEMPLE_OUTER_L)?,
        set.point(face::TEMPLE_OUTER_R)?,
    );
    let inner = center_point(
        set.point(face::TEMPLE_INNER_L)?,
        set.point(face::TEMPLE_INNER_R)?,
    );
    Ok(center_point(outer, inner))
}

/// Average of the outer and inner eye-corner spans; normalizes every
/// distance feature so head-to-camera distance cancels out.
pub fn interocular_distance(set: &LandmarkSet) -> Result<f64, TrackError> {
    let outer = (set.point(face::EYE_OUTER_L)? - set.point(face::EYE_OUTER_R)?).norm();
    let inner = (set.point(face::EYE_INNER_L)? - set.point(face::EYE_INNER_R)?).norm();
    Ok((outer + inner) * 0.5)
}
