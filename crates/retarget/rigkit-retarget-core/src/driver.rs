//! Session-persistent driver points.
//!
//! One driver point per semantic joint/feature, created at session setup and
//! mutated every frame; never destroyed while the session lives. Writes go
//! through the registry so the persistent state and the outgoing batch can
//! not drift apart.

use rigkit_api_core::{DriverRef, Euler, UpdateBatch};

use crate::math::Vec3;

#[derive(Clone, Debug)]
pub struct DriverPoint {
    /// Slot in the host scene's driver array.
    pub slot: u32,
    pub name: &'static str,
    pub location: Vec3,
    pub rotation: Euler,
    pub scale: Vec3,
}

impl DriverPoint {
    fn new(slot: u32, name: &'static str) -> Self {
        Self {
            slot,
            name,
            location: Vec3::zeros(),
            rotation: Euler::default(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Driver points owned by one feature state, ordered by slot.
#[derive(Debug, Default)]
pub struct DriverRegistry {
    points: Vec<DriverPoint>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: u32, name: &'static str) {
        debug_assert!(self.get(slot).is_none(), "slot {slot} registered twice");
        self.points.push(DriverPoint::new(slot, name));
    }

    pub fn get(&self, slot: u32) -> Option<&DriverPoint> {
        self.points.iter().find(|p| p.slot == slot)
    }

    pub fn get_mut(&mut self, slot: u32) -> Option<&mut DriverPoint> {
        self.points.iter_mut().find(|p| p.slot == slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DriverPoint> {
        self.points.iter()
    }

    /// References for the mapping layer (name + slot per driver).
    pub fn refs(&self) -> Vec<DriverRef> {
        self.points
            .iter()
            .map(|p| DriverRef::new(p.name, p.slot))
            .collect()
    }

    pub fn write_location(&mut self, slot: u32, location: Vec3, out: &mut UpdateBatch) {
        if let Some(point) = self.get_mut(slot) {
            point.location = location;
        }
        out.push_position(slot, [location.x, location.y, location.z]);
    }

    pub fn write_rotation(&mut self, slot: u32, rotation: Euler, out: &mut UpdateBatch) {
        if let Some(point) = self.get_mut(slot) {
            point.rotation = rotation;
        }
        out.push_rotation(slot, rotation);
    }

    /// Uniform scale write; limb lengths and face distances drive all three
    /// axes together.
    pub fn write_scale(&mut self, slot: u32, scale: f64, out: &mut UpdateBatch) {
        let scale = Vec3::new(scale, scale, scale);
        if let Some(point) = self.get_mut(slot) {
            point.scale = scale;
        }
        out.push_scale(slot, [scale.x, scale.y, scale.z]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_update_point_and_batch() {
        let mut registry = DriverRegistry::new();
        registry.insert(3, "drv_test");
        let mut out = UpdateBatch::new();
        registry.write_location(3, Vec3::new(1.0, 2.0, 3.0), &mut out);
        registry.write_scale(3, 0.5, &mut out);
        assert_eq!(registry.get(3).unwrap().location, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(registry.get(3).unwrap().scale, Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(out.positions.len(), 1);
        assert_eq!(out.scales.len(), 1);
    }
}
