use glam::Vec3;

use crate::collision::registry::ShapeRegistry;
use crate::core::shapes::Shape;
use crate::error::CollisionError;

/// Two surface points found by projecting a query shape and a primitive onto each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeContact {
    /// Point nearer the query centre, where the two surfaces meet.
    pub point: Vec3,
    /// Point farther from the query centre, reached by the overlap.
    pub penetration: Vec3,
}

impl ShapeContact {
    /// Translation that moves the query shape out of the primitive.
    pub fn push(&self) -> Vec3 {
        self.point - self.penetration
    }

    pub fn is_touching(&self) -> bool {
        self.push() == Vec3::ZERO
    }
}

/// Nearest-point contact between a query shape and a primitive.
pub struct ContactResolver;

impl ContactResolver {
    pub fn resolve(
        registry: &ShapeRegistry,
        query: &Shape,
        primitive: &Shape,
    ) -> Result<ShapeContact, CollisionError> {
        let center = registry.reference_point(query)?;
        let primitive_contact = registry.closest_point(primitive, center)?;
        let query_contact = registry.closest_point(query, primitive_contact)?;

        let primitive_distance = primitive_contact.distance_squared(center);
        let query_distance = query_contact.distance_squared(center);

        if primitive_distance > query_distance {
            Ok(ShapeContact {
                point: query_contact,
                penetration: primitive_contact,
            })
        } else {
            Ok(ShapeContact {
                point: primitive_contact,
                penetration: query_contact,
            })
        }
    }
}
