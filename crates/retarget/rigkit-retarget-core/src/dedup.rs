//! Duplicate-frame guard.
//!
//! Some capture backends redeliver the previous frame's data under certain
//! platform/driver conditions; keyframing those frames duplicates keys in the
//! host scene. The guard fingerprints each frame cheaply and suppresses
//! output when the fingerprint repeats. A repeat on a later frame number
//! means detector staleness, not an error.

use crate::inputs::Landmark;

/// How many leading landmarks feed the fingerprint.
const FINGERPRINT_POINTS: usize = 21;

#[derive(Debug, Default)]
pub struct DuplicateGuard {
    fingerprint: Option<f64>,
}

impl DuplicateGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when this frame repeats the stored fingerprint. Non-duplicates
    /// replace the stored value.
    pub fn check(&mut self, landmarks: &[Landmark]) -> bool {
        let fingerprint: f64 = landmarks
            .iter()
            .take(FINGERPRINT_POINTS)
            .map(|l| l.position[0] + l.position[1] + l.position[2])
            .sum();
        if self.fingerprint == Some(fingerprint) {
            log::debug!("duplicate landmark fingerprint {fingerprint}, suppressing frame");
            return true;
        }
        self.fingerprint = Some(fingerprint);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(seed: f64) -> Vec<Landmark> {
        (0..25)
            .map(|i| Landmark {
                index: i,
                position: [seed + i as f64, 0.5, -0.5],
            })
            .collect()
    }

    #[test]
    fn repeated_frame_is_flagged() {
        let mut guard = DuplicateGuard::new();
        let f = frame(0.0);
        assert!(!guard.check(&f));
        assert!(guard.check(&f));
    }

    #[test]
    fn perturbed_frame_is_not_flagged() {
        let mut guard = DuplicateGuard::new();
        let mut f = frame(0.0);
        assert!(!guard.check(&f));
        f[3].position[1] += 1e-3;
        assert!(!guard.check(&f));
    }

    #[test]
    fn changes_past_the_fingerprint_window_are_invisible() {
        let mut guard = DuplicateGuard::new();
        let mut f = frame(0.0);
        assert!(!guard.check(&f));
        f[23].position[0] += 1.0; // beyond the first 21 points
        assert!(guard.check(&f));
    }
}
