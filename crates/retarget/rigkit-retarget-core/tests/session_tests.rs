use rigkit_retarget_core::face::{
    CHIN_SLOT, EYEBROW_L_SLOT, EYEBROW_R_SLOT, EYELID_L_SLOT, EYELID_R_SLOT, HEAD_SLOT,
    MOUTH_CORNER_L_SLOT, MOUTH_CORNER_R_SLOT, MOUTH_SLOT,
};
use rigkit_retarget_core::pose::{HIP_CENTER_SLOT, SHOULDER_CENTER_SLOT};
use rigkit_retarget_core::{
    Config, DetectionTarget, FrameInput, Landmark, Session, TrackError,
};
use rigkit_api_core::sink::RecordingSink;
use rigkit_test_fixtures::{neutral_face, t_pose, RawLandmark};

fn to_input(frame_number: u64, raw: Vec<RawLandmark>) -> FrameInput {
    FrameInput::new(
        frame_number,
        raw.into_iter()
            .map(|(index, position)| Landmark::new(index, position))
            .collect(),
    )
}

/// it should suppress all output for a redelivered frame
#[test]
fn duplicate_frame_suppresses_output() {
    let cfg = Config::new(DetectionTarget::Pose, 1).unwrap();
    let mut session = Session::new(cfg);

    let first = session.advance(&to_input(1, t_pose())).unwrap();
    assert!(!first.is_empty());

    let second = session.advance(&to_input(2, t_pose())).unwrap();
    assert!(second.is_empty(), "redelivered frame must be suppressed");

    // Changing a single coordinate clears the staleness.
    let mut moved = t_pose();
    moved[0].1[0] += 1e-3;
    let third = session.advance(&to_input(3, moved)).unwrap();
    assert!(!third.is_empty());
}

/// it should surface an empty detector frame as the only session error
#[test]
fn empty_frame_is_a_detector_failure() {
    let cfg = Config::new(DetectionTarget::Pose, 1).unwrap();
    let mut session = Session::new(cfg);
    let err = session.advance(&to_input(9, Vec::new())).unwrap_err();
    assert_eq!(err, TrackError::EmptyFrame { frame: 9 });
}

/// it should emit centers, torso/shoulder rotations and limb scales for a pose
#[test]
fn pose_session_emits_expected_channels() {
    let cfg = Config::new(DetectionTarget::Pose, 1).unwrap();
    let mut session = Session::new(cfg);
    let batch = session.advance(&to_input(1, t_pose())).unwrap();

    // Synthesized centers land after the detector's 33 slots.
    assert!(batch.positions.iter().any(|p| p.slot == SHOULDER_CENTER_SLOT));
    assert!(batch.positions.iter().any(|p| p.slot == HIP_CENTER_SLOT));
    // One raw proxy position per detected landmark plus the two centers.
    assert_eq!(batch.positions.len(), 33 + 2);

    assert!(batch.rotations.iter().any(|r| r.slot == HIP_CENTER_SLOT));
    assert!(batch.rotations.iter().any(|r| r.slot == SHOULDER_CENTER_SLOT));

    // Every limb segment re-measured this frame.
    assert_eq!(batch.scales.len(), 12);
    for scale in &batch.scales {
        assert!(scale.scale[0] > 0.0);
    }
}

/// it should re-measure limb lengths from the current frame only
#[test]
fn limb_lengths_follow_frame_proportions() {
    let cfg = Config::new(DetectionTarget::Pose, 1).unwrap();
    let mut session = Session::new(cfg);
    let batch = session.advance(&to_input(1, t_pose())).unwrap();
    let left_forearm = batch
        .scales
        .iter()
        .find(|s| s.slot == 15) // left wrist, distal end of elbow->wrist
        .expect("left forearm measured")
        .scale[0];
    // T-pose forearm: elbow (0.45, -0.40) to wrist (0.70, -0.40).
    assert!((left_forearm - 0.25).abs() < 1e-9);

    // Stretch the arm; the next frame's measurement follows.
    let mut stretched = t_pose();
    for l in stretched.iter_mut() {
        if l.0 == 15 {
            l.1[0] = 0.80;
        }
    }
    let batch = session.advance(&to_input(2, stretched)).unwrap();
    let stretched_forearm = batch
        .scales
        .iter()
        .find(|s| s.slot == 15)
        .unwrap()
        .scale[0];
    assert!((stretched_forearm - 0.35).abs() < 1e-9);
}

/// it should emit pivot, rotations and normalized distance features for a face
#[test]
fn face_session_emits_expected_channels() {
    let cfg = Config::new(DetectionTarget::Face, 1).unwrap();
    let mut session = Session::new(cfg);
    let batch = session.advance(&to_input(1, neutral_face())).unwrap();

    assert!(batch.positions.iter().any(|p| p.slot == HEAD_SLOT));
    for slot in [HEAD_SLOT, CHIN_SLOT, MOUTH_CORNER_L_SLOT, MOUTH_CORNER_R_SLOT] {
        assert!(
            batch.rotations.iter().any(|r| r.slot == slot),
            "rotation missing at slot {slot}"
        );
    }
    for slot in [
        MOUTH_SLOT,
        EYEBROW_L_SLOT,
        EYEBROW_R_SLOT,
        EYELID_L_SLOT,
        EYELID_R_SLOT,
    ] {
        assert!(
            batch.scales.iter().any(|s| s.slot == slot),
            "scale missing at slot {slot}"
        );
    }

    // Distance features are normalized by the interocular span, so they sit
    // well below 1 for a neutral face.
    for s in &batch.scales {
        assert!(s.scale[0] > 0.0 && s.scale[0] < 1.0);
    }
}

/// it should keep working when optional face landmarks are missing
#[test]
fn face_session_survives_partial_mesh() {
    let cfg = Config::new(DetectionTarget::Face, 1).unwrap();
    let mut session = Session::new(cfg);
    // Strip the mouth landmarks: corner/mouth features skip, rest survives.
    let raw: Vec<RawLandmark> = neutral_face()
        .into_iter()
        .filter(|(i, _)| ![13, 14, 61, 291].contains(i))
        .collect();
    let batch = session.advance(&to_input(1, raw)).unwrap();
    assert!(batch.rotations.iter().any(|r| r.slot == HEAD_SLOT));
    assert!(!batch.scales.iter().any(|s| s.slot == MOUTH_SLOT));
}

/// it should scale keyframe numbers by key_step and skip empty batches
#[test]
fn advance_into_applies_key_step() {
    let cfg = Config::new(DetectionTarget::Pose, 3).unwrap();
    let mut session = Session::new(cfg);
    let mut sink = RecordingSink::default();

    session
        .advance_into(&to_input(5, t_pose()), &mut sink)
        .unwrap();
    // Duplicate frame: advance succeeds but nothing reaches the sink.
    session
        .advance_into(&to_input(6, t_pose()), &mut sink)
        .unwrap();

    assert_eq!(sink.frames.len(), 1);
    assert_eq!(sink.frames[0].0, 15);
    assert!(!sink.frames[0].1.is_empty());
}

/// it should expose the driver points the mapping layer resolves against
#[test]
fn driver_refs_cover_session_targets() {
    let cfg = Config::new(DetectionTarget::Pose, 1).unwrap();
    let session = Session::new(cfg);
    let refs = session.driver_refs();
    assert!(refs.iter().any(|d| d.name == "drv_shoulder_center"));
    assert!(refs.iter().any(|d| d.name == "drv_hip_center"));
    assert!(refs.iter().all(|d| d.name.starts_with("drv_")));
}
