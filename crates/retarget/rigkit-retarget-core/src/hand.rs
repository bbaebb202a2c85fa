//! Finger angle estimation and global hand orientation.
//!
//! Per hand: an x-angle (flexion) per interior finger joint from plane
//! projection, a z-angle (spread) per finger base from a circle search
//! around the palm tangent, and one global orientation from a
//! wrist/index-base/pinky-base frame. Joint angles at zero are omitted from
//! the output batch; the consuming bridge treats absence as "unchanged".

use hashbrown::HashMap;
use nalgebra::UnitQuaternion;
use std::f64::consts::PI;

use rigkit_api_core::{names, Euler, UpdateBatch};

use crate::continuity::{apply_angular_offset, ContinuityCache};
use crate::driver::DriverRegistry;
use crate::error::TrackError;
use crate::inputs::FrameInput;
use crate::landmarks::{hand, LandmarkSet};
use crate::math::{
    angle_between, circle_around_vector, closest_point_index, decompose, normalize,
    orthonormal_frame, project_point_on_line, project_point_on_plane, signed_plane_distance,
    EPSILON,
};

/// Joint chains per finger, base joint first: thumb, index, middle, ring,
/// pinky. Non-thumb chains are walked with the wrist prepended as implicit
/// origin; the thumb spans its own four landmarks.
const FINGERS: [[u32; 4]; 5] = [
    [hand::THUMB_CMC, hand::THUMB_MCP, hand::THUMB_IP, hand::THUMB_TIP],
    [hand::INDEX_MCP, hand::INDEX_PIP, hand::INDEX_DIP, hand::INDEX_TIP],
    [hand::MIDDLE_MCP, hand::MIDDLE_PIP, hand::MIDDLE_DIP, hand::MIDDLE_TIP],
    [hand::RING_MCP, hand::RING_PIP, hand::RING_DIP, hand::RING_TIP],
    [hand::PINKY_MCP, hand::PINKY_PIP, hand::PINKY_DIP, hand::PINKY_TIP],
];

const THUMB: usize = 0;

/// Circle resolution of the z-angle closest-point search. Calibration data.
const CIRCLE_POINTS: usize = 40;

/// Keeps the right hand's continuity slots clear of the left hand's.
const RIGHT_HAND_CONTINUITY_OFFSET: u32 = 100;

/// Rest-pose pre-rotation and post-offset for the global orientation, in
/// units of π; the z terms mirror per side. Calibration data recovered
/// against the detector's real-world output distribution; preserved as-is.
const REST_PRE_ROTATION: [f64; 3] = [0.25, 0.0, 0.1];
const HAND_ANGULAR_OFFSET: [f64; 3] = [-0.5, 0.0, -0.25];

/// Angles at or below this are emitted as "unchanged".
const MIN_JOINT_ANGLE: f64 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn from_handedness(is_right: bool) -> Self {
        if is_right {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// Driver slots: left hand at 0..=20, right hand at 21..=41.
    pub fn slot_base(self) -> u32 {
        match self {
            Side::Left => 0,
            Side::Right => hand::PINKY_TIP + 1,
        }
    }

    fn continuity_offset(self) -> u32 {
        match self {
            Side::Left => 0,
            Side::Right => RIGHT_HAND_CONTINUITY_OFFSET,
        }
    }

    fn mirror(self) -> f64 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// Per-session hand state: continuity cache plus both hands' driver points.
#[derive(Debug)]
pub struct HandState {
    continuity: ContinuityCache,
    drivers: DriverRegistry,
}

impl Default for HandState {
    fn default() -> Self {
        Self::new()
    }
}

impl HandState {
    pub fn new() -> Self {
        let mut drivers = DriverRegistry::new();
        for (side, hand_name, joints) in [
            (Side::Left, names::HAND_L, &names::FINGER_JOINTS_L),
            (Side::Right, names::HAND_R, &names::FINGER_JOINTS_R),
        ] {
            drivers.insert(side.slot_base() + hand::WRIST, hand_name);
            for (finger, chain) in FINGERS.iter().enumerate() {
                for joint in 0..3 {
                    drivers.insert(side.slot_base() + chain[joint], joints[finger * 3 + joint]);
                }
            }
        }
        Self {
            continuity: ContinuityCache::new(),
            drivers,
        }
    }

    pub fn drivers(&self) -> &DriverRegistry {
        &self.drivers
    }

    /// Process every detected hand of the frame. Failures are per-hand and
    /// per-finger; nothing here aborts the frame.
    pub fn process(&mut self, input: &FrameInput, out: &mut UpdateBatch) {
        for h in &input.handedness {
            let Some(group) = input.hand_group(h.group) else {
                log::warn!("handedness entry references group {} beyond the frame", h.group);
                continue;
            };
            let set = LandmarkSet::new(group);
            let side = Side::from_handedness(h.is_right);
            if let Err(err) = self.process_hand(&set, side, out) {
                log::warn!("{side:?} hand skipped this frame: {err}");
            }
        }
    }

    fn process_hand(
        &mut self,
        set: &LandmarkSet,
        side: Side,
        out: &mut UpdateBatch,
    ) -> Result<(), TrackError> {
        let orientation = self.global_orientation(set, side)?;
        self.drivers
            .write_rotation(side.slot_base() + hand::WRIST, orientation, out);

        let mut joints: HashMap<u32, Euler> = HashMap::new();
        for (finger, chain) in FINGERS.iter().enumerate() {
            match finger_x_angles(set, chain, finger != THUMB) {
                Ok(angles) => {
                    for (landmark, angle) in angles {
                        joints.entry(side.slot_base() + landmark).or_default().x = angle;
                    }
                }
                Err(err) => log::debug!("finger {finger} x-angles skipped: {err}"),
            }
            match finger_z_angle(set, chain, z_hint(finger)) {
                Ok((landmark, angle)) => {
                    joints.entry(side.slot_base() + landmark).or_default().z = angle;
                }
                Err(err) => log::debug!("finger {finger} z-angle skipped: {err}"),
            }
        }

        let mut slots: Vec<u32> = joints.keys().copied().collect();
        slots.sort_unstable();
        for slot in slots {
            let euler = joints[&slot];
            if euler.x.abs() > MIN_JOINT_ANGLE || euler.z.abs() > MIN_JOINT_ANGLE {
                self.drivers.write_rotation(slot, euler, out);
            }
        }
        Ok(())
    }

    /// Orientation frame from wrist, index base and pinky base, decomposed
    /// and resolved against this side's continuity slots.
    fn global_orientation(&mut self, set: &LandmarkSet, side: Side) -> Result<Euler, TrackError> {
        let rest = rest_pre_rotation(side);
        let wrist = set.point(hand::WRIST)?;
        let u = rest * (set.point(hand::INDEX_MCP)? - wrist);
        let v = rest * (set.point(hand::PINKY_MCP)? - wrist);

        let tangent = normalize(u)?;
        let normal = normalize(u.cross(&v))?;
        let binormal = tangent.cross(&normal);

        let (_, rotation, _) = decompose(&orthonormal_frame(tangent, normal, binormal));
        let euler = self.continuity.resolve(
            &rotation,
            side.slot_base() + hand::WRIST,
            side.continuity_offset(),
        );
        let offset = HAND_ANGULAR_OFFSET;
        Ok(apply_angular_offset(
            euler,
            [offset[0], offset[1], offset[2] * side.mirror()],
        ))
    }
}

fn rest_pre_rotation(side: Side) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(
        REST_PRE_ROTATION[0] * PI,
        REST_PRE_ROTATION[1] * PI,
        REST_PRE_ROTATION[2] * PI * side.mirror(),
    )
}

/// In-plane hint landmark for the z-angle circle: thumb-relative for the
/// thumb/index/middle, pinky-relative for ring/pinky. The asymmetry follows
/// natural hand kinematics.
fn z_hint(finger: usize) -> u32 {
    if finger >= 3 {
        hand::PINKY_TIP
    } else {
        hand::THUMB_CMC
    }
}

/// Flexion angles of one finger: the chain is flattened onto the plane
/// spanned by its origin, base joint and tip, then the direction change at
/// each interior joint is measured. A perfectly collinear chain has no plane
/// to flatten onto and needs none; it is measured raw.
pub fn finger_x_angles(
    set: &LandmarkSet,
    chain: &[u32; 4],
    include_wrist: bool,
) -> Result<Vec<(u32, f64)>, TrackError> {
    let mut indices: Vec<u32> = Vec::with_capacity(5);
    if include_wrist {
        indices.push(hand::WRIST);
    }
    indices.extend_from_slice(chain);

    let points: Vec<_> = indices
        .iter()
        .map(|&i| set.point(i))
        .collect::<Result<_, _>>()?;
    let plane = [points[0], points[1], points[points.len() - 1]];
    let flat: Vec<_> = match points
        .iter()
        .map(|&p| project_point_on_plane(&plane, p))
        .collect::<Result<_, _>>()
    {
        Ok(flat) => flat,
        Err(TrackError::DegenerateVector { .. }) => points.clone(),
        Err(other) => return Err(other),
    };

    let mut angles = Vec::with_capacity(3);
    for j in 1..flat.len() - 1 {
        let prev = flat[j] - flat[j - 1];
        let next = flat[j + 1] - flat[j];
        angles.push((indices[j], angle_between(prev, next)?));
    }
    Ok(angles)
}

/// Spread angle of one finger's base joint.
///
/// The base is projected onto the palm tangent (index base → pinky base) to
/// anchor a circle around that tangent with radius out to the finger's middle
/// joint. The angle between the middle joint and its closest circle point
/// measures the out-of-circle-plane spread; the side of the circle plane
/// fixes the sign.
pub fn finger_z_angle(
    set: &LandmarkSet,
    chain: &[u32; 4],
    hint_landmark: u32,
) -> Result<(u32, f64), TrackError> {
    let base = set.point(chain[0])?;
    let mid = set.point(chain[1])?;
    let index_mcp = set.point(hand::INDEX_MCP)?;
    let pinky_mcp = set.point(hand::PINKY_MCP)?;

    let anchor = project_point_on_line(base, index_mcp, pinky_mcp)?;
    let radius = (mid - anchor).norm();
    if radius <= EPSILON {
        return Err(TrackError::DegenerateVector { length: radius });
    }

    let hint = set.point(hint_landmark)? - anchor;
    let circle = circle_around_vector(
        pinky_mcp - index_mcp,
        anchor,
        radius,
        CIRCLE_POINTS,
        hint,
    )?;
    let closest = circle[closest_point_index(mid, &circle).unwrap_or(0)];

    let mut angle = angle_between(mid - anchor, closest - anchor)?;
    let gate = [circle[0], circle[CIRCLE_POINTS / 4], circle[CIRCLE_POINTS / 2]];
    if signed_plane_distance(&gate, mid)? < 0.0 {
        angle = -angle;
    }
    Ok((chain[0], angle))
}
