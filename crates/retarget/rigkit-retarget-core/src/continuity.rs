//! Rotation continuity resolution.
//!
//! Quaternion→Euler conversion is not unique; converting every frame
//! independently produces visible snapping whenever the decomposition flips
//! between its two gimbal solutions or wraps past ±π. The cache keeps the
//! last emitted Euler per tracked slot and uses it to disambiguate the next
//! conversion: both solutions are unwrapped toward the hint and the closer
//! one wins.

use std::f64::consts::{PI, TAU};

use hashbrown::HashMap;

use rigkit_api_core::Euler;

use crate::math::Quat;

/// Per-slot cache of the last assigned Euler rotation. One instance per
/// feature state; never shared across sessions.
#[derive(Debug, Default)]
pub struct ContinuityCache {
    entries: HashMap<u32, Euler>,
}

impl ContinuityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert `rotation` to Euler using the cached rotation at
    /// `slot + offset` as the continuity hint. Every successful conversion
    /// overwrites the cache entry, hinted or not; that is what keeps
    /// subsequent frames continuous.
    pub fn resolve(&mut self, rotation: &Quat, slot: u32, offset: u32) -> Euler {
        let key = slot + offset;
        let euler = match self.entries.get(&key).copied() {
            Some(hint) => compatible_euler(rotation, hint),
            None => {
                // Expected on the first frame of a session.
                log::debug!("no continuity reference for slot {key}, converting unhinted");
                euler_xyz(rotation)
            }
        };
        self.entries.insert(key, euler);
        euler
    }
}

/// Plain Euler decomposition, no hint.
pub fn euler_xyz(rotation: &Quat) -> Euler {
    let (x, y, z) = rotation.euler_angles();
    Euler::new(x, y, z)
}

/// Pick the Euler representation of `rotation` closest to `hint`.
///
/// Candidates: the direct decomposition and its gimbal twin
/// (x+π, π−y, z+π), each with every axis unwrapped by whole turns toward
/// the hint.
pub fn compatible_euler(rotation: &Quat, hint: Euler) -> Euler {
    let direct = euler_xyz(rotation);
    let twin = Euler::new(direct.x + PI, PI - direct.y, direct.z + PI);

    let a = unwrap_toward(direct, hint);
    let b = unwrap_toward(twin, hint);
    if b.max_axis_delta(hint) < a.max_axis_delta(hint) {
        b
    } else {
        a
    }
}

/// Add `π·offset[i]` to each axis. Used when a feature's natural zero
/// rotation does not line up with the rig's rest pose.
pub fn apply_angular_offset(euler: Euler, offset: [f64; 3]) -> Euler {
    Euler::new(
        euler.x + PI * offset[0],
        euler.y + PI * offset[1],
        euler.z + PI * offset[2],
    )
}

fn unwrap_axis(value: f64, hint: f64) -> f64 {
    let mut v = value;
    while v - hint > PI {
        v -= TAU;
    }
    while hint - v > PI {
        v += TAU;
    }
    v
}

fn unwrap_toward(euler: Euler, hint: Euler) -> Euler {
    Euler::new(
        unwrap_axis(euler.x, hint.x),
        unwrap_axis(euler.y, hint.y),
        unwrap_axis(euler.z, hint.z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    #[test]
    fn unhinted_resolution_populates_cache() {
        let mut cache = ContinuityCache::new();
        assert!(cache.is_empty());
        let q = UnitQuaternion::from_euler_angles(0.3, 0.0, 0.0);
        let e = cache.resolve(&q, 4, 0);
        assert_relative_eq!(e.x, 0.3, epsilon = 1e-9);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn offset_separates_slots() {
        let mut cache = ContinuityCache::new();
        let q = UnitQuaternion::from_euler_angles(0.1, 0.0, 0.0);
        cache.resolve(&q, 0, 0);
        cache.resolve(&q, 0, 100);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn hint_unwraps_past_pi() {
        let mut cache = ContinuityCache::new();
        // Walk x rotation up to just below π, then past it.
        let mut last = Euler::default();
        for step in 0..220 {
            let angle = step as f64 * 0.017; // ~1° per frame, crosses π near 185
            let q = UnitQuaternion::from_axis_angle(&nalgebra::Unit::new_normalize(Vec3::x()), angle);
            let e = cache.resolve(&q, 7, 0);
            if step > 0 {
                assert!(
                    e.max_axis_delta(last) < 0.02 + 1e-6,
                    "jump at step {step}: {last:?} -> {e:?}"
                );
            }
            last = e;
        }
        // The resolved angle kept growing instead of wrapping to -π.
        assert!(last.x > 3.0);
    }

    #[test]
    fn angular_offset_is_in_units_of_pi() {
        let e = apply_angular_offset(Euler::new(0.1, 0.0, 0.0), [1.0, 0.5, -1.0]);
        assert_relative_eq!(e.x, 0.1 + PI, epsilon = 1e-12);
        assert_relative_eq!(e.y, PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(e.z, -PI, epsilon = 1e-12);
    }
}
