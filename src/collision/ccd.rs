use glam::Vec3;

use crate::collision::registry::ShapeRegistry;
use crate::core::shapes::{AabbExtent, Shape};
use crate::error::CollisionError;

/// Builds the axis-aligned volume covering a shape's path over one step.
pub struct SweepVolume;

impl SweepVolume {
    /// Whether `velocity` moves the shape far enough on some axis to need a sweep.
    pub fn is_fast(extent: Vec3, velocity: Vec3, trigger_ratio: f32) -> bool {
        (0..3).any(|axis| velocity[axis].abs() > extent[axis] * trigger_ratio)
    }

    /// `shape` is in its post-motion pose and `velocity` is the step that moved it there.
    pub fn build(
        registry: &ShapeRegistry,
        shape: &Shape,
        velocity: Vec3,
        trigger_ratio: f32,
    ) -> Result<Option<AabbExtent>, CollisionError> {
        let extent = shape.sweep_extent();
        if !Self::is_fast(extent, velocity, trigger_ratio) {
            return Ok(None);
        }

        let current = registry.reference_point(shape)?;
        let previous = current - velocity;
        let center = (current + previous) * 0.5;

        Ok(Some(AabbExtent::new(
            center,
            (current - center).abs() + extent,
        )))
    }
}
