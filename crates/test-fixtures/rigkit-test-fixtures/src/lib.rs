//! Synthetic landmark clouds for rigkit tests.
//!
//! Everything here is in detector-local coordinates (x right, y down, z
//! toward the camera), exactly as an upstream landmarker would deliver it.
//! Fixtures return `(index, position)` tuples so consumers can map them into
//! their own input types.

pub type RawLandmark = (u32, [f64; 3]);

fn scale(v: [f64; 3], s: f64) -> [f64; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

fn unit(v: [f64; 3]) -> [f64; 3] {
    scale(v, 1.0 / norm(v))
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Finger ray directions from the wrist: thumb, index, middle, ring, pinky.
const FINGER_DIRS: [[f64; 3]; 5] = [
    [0.050, 0.040, -0.010],
    [-0.020, 0.090, -0.010],
    [-0.007, 0.100, -0.010],
    [0.007, 0.098, -0.010],
    [0.020, 0.090, -0.010],
];

/// Joint positions along each ray, as fractions of the ray direction.
const JOINT_STOPS: [f64; 4] = [0.55, 0.70, 0.85, 1.00];

/// A fully extended hand: every finger's joints are collinear with the
/// wrist, so all flexion angles are exactly zero.
pub fn straight_hand() -> Vec<RawLandmark> {
    let mut landmarks = vec![(0u32, [0.0, 0.0, 0.0])];
    for (finger, dir) in FINGER_DIRS.iter().enumerate() {
        for (joint, stop) in JOINT_STOPS.iter().enumerate() {
            let index = 1 + finger as u32 * 4 + joint as u32;
            landmarks.push((index, scale(*dir, *stop)));
        }
    }
    landmarks
}

/// A straight hand whose index finger bends by `angle` radians at the PIP
/// joint, within the plane containing the wrist (so the estimator's plane
/// projection is exact).
pub fn bent_index_hand(angle: f64) -> Vec<RawLandmark> {
    let mut landmarks = straight_hand();
    let dir = unit(FINGER_DIRS[1]);
    let side = unit(cross(FINGER_DIRS[1], [0.0, 0.0, 1.0]));
    let seg = 0.015;

    let pip = scale(FINGER_DIRS[1], JOINT_STOPS[1]);
    let bent = add(scale(dir, angle.cos() * seg), scale(side, angle.sin() * seg));
    let dip = add(pip, bent);
    let tip = add(pip, scale(bent, 2.0));
    for l in landmarks.iter_mut() {
        match l.0 {
            7 => l.1 = dip,
            8 => l.1 = tip,
            _ => {}
        }
    }
    landmarks
}

/// Translate a hand group in space so a second hand can be concatenated
/// into the same frame.
pub fn offset_group(group: &[RawLandmark], shift: [f64; 3]) -> Vec<RawLandmark> {
    group.iter().map(|(i, p)| (*i, add(*p, shift))).collect()
}

/// An upright T-pose with all 33 pose landmarks.
pub fn t_pose() -> Vec<RawLandmark> {
    let sides: [(u32, f64); 2] = [(0, 1.0), (1, -1.0)]; // (left, right) in ±x
    let mut landmarks = vec![
        (0, [0.0, -0.60, 0.0]), // nose
    ];
    for (offset, s) in sides {
        landmarks.extend_from_slice(&[
            (1 + offset * 3, [s * 0.03, -0.63, 0.0]),  // eye inner
            (2 + offset * 3, [s * 0.04, -0.63, 0.0]),  // eye
            (3 + offset * 3, [s * 0.05, -0.63, 0.0]),  // eye outer
            (7 + offset, [s * 0.07, -0.61, 0.02]),     // ear
            (9 + offset, [s * 0.02, -0.56, -0.01]),    // mouth
            (11 + offset, [s * 0.20, -0.40, 0.0]),     // shoulder
            (13 + offset, [s * 0.45, -0.40, 0.0]),     // elbow
            (15 + offset, [s * 0.70, -0.40, 0.0]),     // wrist
            (17 + offset, [s * 0.76, -0.41, 0.0]),     // pinky
            (19 + offset, [s * 0.78, -0.40, 0.0]),     // index
            (21 + offset, [s * 0.74, -0.38, 0.0]),     // thumb
            (23 + offset, [s * 0.12, 0.10, 0.0]),      // hip
            (25 + offset, [s * 0.14, 0.50, 0.0]),      // knee
            (27 + offset, [s * 0.15, 0.90, 0.0]),      // ankle
            (29 + offset, [s * 0.15, 0.95, 0.03]),     // heel
            (31 + offset, [s * 0.16, 0.97, -0.05]),    // foot index
        ]);
    }
    landmarks.sort_by_key(|l| l.0);
    landmarks
}

/// A neutral face: the landmark subset the extractor reads, centered on the
/// temples, eyes open, mouth closed.
pub fn neutral_face() -> Vec<RawLandmark> {
    vec![
        (1, [0.0, 0.030, -0.060]),    // nose tip
        (4, [0.0, 0.035, -0.050]),    // nose base
        (13, [0.0, 0.075, -0.030]),   // lip top
        (14, [0.0, 0.080, -0.030]),   // lip bottom
        (33, [-0.045, 0.0, -0.020]),  // eye outer L
        (61, [-0.025, 0.078, -0.025]), // mouth corner L
        (93, [-0.075, 0.010, 0.012]), // temple inner L
        (105, [-0.030, -0.025, -0.020]), // eyebrow L
        (127, [-0.080, 0.0, 0.010]),  // temple outer L
        (133, [-0.015, 0.0, -0.020]), // eye inner L
        (145, [-0.030, 0.005, -0.025]), // eyelid bottom L
        (152, [0.0, 0.110, -0.020]),  // chin
        (159, [-0.030, -0.005, -0.025]), // eyelid top L
        (168, [0.0, -0.005, -0.040]), // nose bridge
        (263, [0.045, 0.0, -0.020]),  // eye outer R
        (291, [0.025, 0.078, -0.025]), // mouth corner R
        (323, [0.075, 0.010, 0.012]), // temple inner R
        (334, [0.030, -0.025, -0.020]), // eyebrow R
        (356, [0.080, 0.0, 0.010]),   // temple outer R
        (362, [0.015, 0.0, -0.020]),  // eye inner R
        (374, [0.030, 0.005, -0.025]), // eyelid bottom R
        (386, [0.030, -0.005, -0.025]), // eyelid top R
    ]
}
