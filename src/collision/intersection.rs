use glam::Vec3;

use crate::core::shapes::{Capsule, Ellipsoid, Obb, Shape, Sphere};
use crate::utils::math::{
    closest_point_on_segment, closest_points_between_segments, point_box_distance_squared,
    segment_box_distance_squared,
};

/// Pairwise overlap predicates used by the shape registry.
///
/// Every predicate takes the query shape first and the primitive second. One
/// registered under the wrong kinds logs an error and reports no overlap.
pub struct Intersection;

impl Intersection {
    fn mismatched(test: &str, query: &Shape, primitive: &Shape) -> bool {
        log::error!(
            "{test} registered for {} against {}, which it cannot test",
            query.kind(),
            primitive.kind()
        );
        false
    }

    /// Corners of an axis-aligned shape.
    fn box_bounds(shape: &Shape) -> Option<(Vec3, Vec3)> {
        match shape {
            Shape::Aabb(aabb) => Some((aabb.min, aabb.max)),
            Shape::AabbExtent(aabbe) => Some((aabbe.min(), aabbe.max())),
            _ => None,
        }
    }

    fn box_as_obb(shape: &Shape) -> Option<Obb> {
        match shape {
            Shape::Aabb(aabb) => Some((*aabb).into()),
            Shape::AabbExtent(aabbe) => Some((*aabbe).into()),
            Shape::Obb(obb) => Some(*obb),
            _ => None,
        }
    }

    pub fn boxes_overlap(min_a: Vec3, max_a: Vec3, min_b: Vec3, max_b: Vec3) -> bool {
        (0..3).all(|axis| min_a[axis] <= max_b[axis] && max_a[axis] >= min_b[axis])
    }

    /// Separating axis test over the 15 candidate axes of two boxes.
    pub fn obb_obb(a: &Obb, b: &Obb) -> bool {
        let relative_pos = b.center - a.center;
        let axes_a = a.axes();
        let axes_b = b.axes();

        let overlaps_on = |axis: Vec3| {
            let extent_a = (axes_a[0].dot(axis).abs() * a.half_extents.x)
                + (axes_a[1].dot(axis).abs() * a.half_extents.y)
                + (axes_a[2].dot(axis).abs() * a.half_extents.z);

            let extent_b = (axes_b[0].dot(axis).abs() * b.half_extents.x)
                + (axes_b[1].dot(axis).abs() * b.half_extents.y)
                + (axes_b[2].dot(axis).abs() * b.half_extents.z);

            relative_pos.dot(axis).abs() <= extent_a + extent_b
        };

        if !axes_a.iter().chain(&axes_b).all(|&axis| overlaps_on(axis)) {
            return false;
        }

        // parallel edge pairs give no usable cross axis
        axes_a.iter().all(|axis_a| {
            axes_b.iter().all(|axis_b| {
                let axis = axis_a.cross(*axis_b);
                axis.length_squared() <= 1e-6 || overlaps_on(axis.normalize())
            })
        })
    }

    pub fn obb_sphere(obb: &Obb, sphere: &Sphere) -> bool {
        let local = obb.to_local(sphere.center);
        point_box_distance_squared(local, -obb.half_extents, obb.half_extents)
            < sphere.radius * sphere.radius
    }

    pub fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
        let reach = a.radius + b.radius;
        a.center.distance_squared(b.center) < reach * reach
    }

    pub fn sphere_capsule(sphere: &Sphere, capsule: &Capsule) -> bool {
        let core = closest_point_on_segment(capsule.start, capsule.end, sphere.center);
        let reach = sphere.radius + capsule.radius;
        core.distance_squared(sphere.center) < reach * reach
    }

    pub fn capsule_capsule(a: &Capsule, b: &Capsule) -> bool {
        let (p, q) = closest_points_between_segments(a.start, a.end, b.start, b.end);
        let reach = a.radius + b.radius;
        p.distance_squared(q) < reach * reach
    }

    /// Scales the box into the ellipsoid's unit space and tests it against the unit sphere.
    pub fn ellipsoid_box(ellipsoid: &Ellipsoid, min: Vec3, max: Vec3) -> bool {
        let unit_min = ellipsoid.to_unit(min);
        let unit_max = ellipsoid.to_unit(max);
        point_box_distance_squared(Vec3::ZERO, unit_min.min(unit_max), unit_min.max(unit_max)) < 1.0
    }

    pub fn capsule_box(capsule: &Capsule, min: Vec3, max: Vec3) -> bool {
        segment_box_distance_squared(capsule.start, capsule.end, min, max)
            < capsule.radius * capsule.radius
    }

    pub fn box_box(query: &Shape, primitive: &Shape) -> bool {
        match (Self::box_bounds(query), Self::box_bounds(primitive)) {
            (Some((min_a, max_a)), Some((min_b, max_b))) => {
                Self::boxes_overlap(min_a, max_a, min_b, max_b)
            }
            _ => Self::mismatched("box_box", query, primitive),
        }
    }

    /// Any pairing of AABB, AABBE and OBB, promoting axis-aligned boxes to OBBs.
    pub fn box_obb(query: &Shape, primitive: &Shape) -> bool {
        match (Self::box_as_obb(query), Self::box_as_obb(primitive)) {
            (Some(a), Some(b)) => Self::obb_obb(&a, &b),
            _ => Self::mismatched("box_obb", query, primitive),
        }
    }

    pub fn box_sphere(query: &Shape, primitive: &Shape) -> bool {
        match (Self::box_bounds(query), primitive) {
            (Some((min, max)), Shape::Sphere(sphere)) => {
                point_box_distance_squared(sphere.center, min, max) < sphere.radius * sphere.radius
            }
            _ => Self::mismatched("box_sphere", query, primitive),
        }
    }

    pub fn sphere_box(query: &Shape, primitive: &Shape) -> bool {
        Self::box_sphere(primitive, query)
    }

    pub fn box_ellipsoid(query: &Shape, primitive: &Shape) -> bool {
        match (Self::box_bounds(query), primitive) {
            (Some((min, max)), Shape::Ellipsoid(ellipsoid)) => {
                Self::ellipsoid_box(ellipsoid, min, max)
            }
            _ => Self::mismatched("box_ellipsoid", query, primitive),
        }
    }

    pub fn ellipsoid_to_box(query: &Shape, primitive: &Shape) -> bool {
        Self::box_ellipsoid(primitive, query)
    }

    pub fn box_capsule(query: &Shape, primitive: &Shape) -> bool {
        match (Self::box_bounds(query), primitive) {
            (Some((min, max)), Shape::Capsule(capsule)) => Self::capsule_box(capsule, min, max),
            _ => Self::mismatched("box_capsule", query, primitive),
        }
    }

    pub fn capsule_to_box(query: &Shape, primitive: &Shape) -> bool {
        Self::box_capsule(primitive, query)
    }

    pub fn obb_to_sphere(query: &Shape, primitive: &Shape) -> bool {
        match (query, primitive) {
            (Shape::Obb(obb), Shape::Sphere(sphere)) | (Shape::Sphere(sphere), Shape::Obb(obb)) => {
                Self::obb_sphere(obb, sphere)
            }
            _ => Self::mismatched("obb_to_sphere", query, primitive),
        }
    }

    pub fn spheres(query: &Shape, primitive: &Shape) -> bool {
        match (query, primitive) {
            (Shape::Sphere(a), Shape::Sphere(b)) => Self::sphere_sphere(a, b),
            _ => Self::mismatched("spheres", query, primitive),
        }
    }

    pub fn sphere_to_capsule(query: &Shape, primitive: &Shape) -> bool {
        match (query, primitive) {
            (Shape::Sphere(sphere), Shape::Capsule(capsule))
            | (Shape::Capsule(capsule), Shape::Sphere(sphere)) => {
                Self::sphere_capsule(sphere, capsule)
            }
            _ => Self::mismatched("sphere_to_capsule", query, primitive),
        }
    }

    pub fn capsules(query: &Shape, primitive: &Shape) -> bool {
        match (query, primitive) {
            (Shape::Capsule(a), Shape::Capsule(b)) => Self::capsule_capsule(a, b),
            _ => Self::mismatched("capsules", query, primitive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn touching_boxes_intersect() {
        let a = Shape::aabb(Vec3::ZERO, Vec3::ONE);
        let b = Shape::aabb(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let c = Shape::aabb_extent(Vec3::new(3.0, 0.5, 0.5), Vec3::splat(0.5));

        assert!(Intersection::box_box(&a, &b), "shared face should count as contact");
        assert!(!Intersection::box_box(&a, &c));
    }

    #[test]
    fn sat_rejects_rotated_box_in_corner_gap() {
        let a = Obb::new(Vec3::ZERO, Vec3::splat(1.0), Quat::IDENTITY);
        let b = Obb::new(
            Vec3::new(2.3, 2.3, 0.0),
            Vec3::splat(1.0),
            Quat::from_rotation_z(45.0f32.to_radians()),
        );
        assert!(!Intersection::obb_obb(&a, &b), "diagonal gap should separate the boxes");

        let c = Obb::new(Vec3::new(1.8, 0.0, 0.0), Vec3::splat(1.0), b.rotation);
        assert!(Intersection::obb_obb(&a, &c));
    }

    #[test]
    fn sphere_touching_box_does_not_overlap() {
        let aabb = Shape::aabb(Vec3::ZERO, Vec3::ONE);
        let touching = Shape::sphere(Vec3::new(1.5, 0.5, 0.5), 0.5);
        let overlapping = Shape::sphere(Vec3::new(1.4, 0.5, 0.5), 0.5);

        assert!(!Intersection::box_sphere(&aabb, &touching));
        assert!(Intersection::box_sphere(&aabb, &overlapping));
        assert!(Intersection::sphere_box(&overlapping, &aabb));
    }

    #[test]
    fn ellipsoid_box_uses_per_axis_radii() {
        let ellipsoid = Ellipsoid::new(Vec3::ZERO, Vec3::new(3.0, 0.5, 0.5));
        let near_long_axis = (Vec3::new(2.5, -0.1, -0.1), Vec3::new(3.5, 0.1, 0.1));
        let near_short_axis = (Vec3::new(-0.1, 0.6, -0.1), Vec3::new(0.1, 1.0, 0.1));

        assert!(Intersection::ellipsoid_box(&ellipsoid, near_long_axis.0, near_long_axis.1));
        assert!(!Intersection::ellipsoid_box(&ellipsoid, near_short_axis.0, near_short_axis.1));
    }

    #[test]
    fn capsule_reaches_box_along_its_segment() {
        let capsule = Capsule::new(Vec3::new(-5.0, 1.4, 0.5), Vec3::new(5.0, 1.4, 0.5), 0.5);
        assert!(Intersection::capsule_box(&capsule, Vec3::ZERO, Vec3::ONE));

        let above = Capsule::new(Vec3::new(-5.0, 1.6, 0.5), Vec3::new(5.0, 1.6, 0.5), 0.5);
        assert!(!Intersection::capsule_box(&above, Vec3::ZERO, Vec3::ONE));
    }

    #[test]
    fn misregistered_predicate_reports_no_overlap() {
        let aabb = Shape::aabb(Vec3::ZERO, Vec3::ONE);
        let sphere = Shape::sphere(Vec3::splat(0.5), 1.0);

        assert!(Intersection::box_sphere(&aabb, &sphere));
        assert!(!Intersection::spheres(&aabb, &sphere));
        assert!(!Intersection::box_capsule(&aabb, &sphere));
        assert!(!Intersection::box_obb(&sphere, &aabb));
    }

    #[test]
    fn capsule_pairs_use_core_segments() {
        let vertical = Capsule::new(Vec3::new(0.0, -2.0, 0.0), Vec3::new(0.0, 2.0, 0.0), 0.5);
        let horizontal = Capsule::new(Vec3::new(-2.0, 0.0, 0.9), Vec3::new(2.0, 0.0, 0.9), 0.5);
        let sphere = Sphere::new(Vec3::new(0.8, 1.5, 0.0), 0.4);

        assert!(Intersection::capsule_capsule(&vertical, &horizontal));
        assert!(Intersection::sphere_capsule(&sphere, &vertical));
        assert!(!Intersection::sphere_capsule(&Sphere::new(Vec3::new(0.8, 2.8, 0.0), 0.4), &vertical));
    }
}
