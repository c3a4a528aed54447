use glam::Vec3;

use crate::core::shapes::{Aabb, AabbExtent, Capsule, Ellipsoid, Obb, Shape, Sphere};
use crate::utils::math::{clamp_to_box, closest_point_on_segment, dominant_axis};

/// Snaps a point that lies on or inside the box `min..max` to the face on the
/// dominant axis of its offset from `center`. Points outside are clamped.
fn box_surface_point(point: Vec3, center: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    let mut clamped = clamp_to_box(point, min, max);
    if clamped != point {
        return clamped;
    }

    let delta = clamped - center;
    let axis = dominant_axis(delta);
    if delta[axis] > 0.0 {
        clamped[axis] = max[axis];
    } else if delta[axis] < 0.0 {
        clamped[axis] = min[axis];
    }
    clamped
}

fn radial_surface_point(center: Vec3, radius: f32, point: Vec3) -> Vec3 {
    let offset = point - center;
    let length = offset.length();
    if length <= f32::EPSILON {
        return center + Vec3::X * radius;
    }
    center + offset * (radius / length)
}

impl Aabb {
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        box_surface_point(point, self.center(), self.min, self.max)
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.min += offset;
        self.max += offset;
    }
}

impl AabbExtent {
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        box_surface_point(point, self.center, self.min(), self.max())
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.center += offset;
    }
}

impl Obb {
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.center)
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.center + self.rotation * local
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let local = self.to_local(point);
        let surface = box_surface_point(local, Vec3::ZERO, -self.half_extents, self.half_extents);
        self.to_world(surface)
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.center += offset;
    }
}

impl Sphere {
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        radial_surface_point(self.center, self.radius, point)
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.center += offset;
    }
}

impl Ellipsoid {
    /// Maps a world point into the space where this ellipsoid is the unit sphere.
    pub fn to_unit(&self, point: Vec3) -> Vec3 {
        (point - self.center) / self.radii
    }

    /// Radial projection in unit space; exact for spheres, approximate otherwise.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let unit = self.to_unit(point);
        let length = unit.length();
        if length <= f32::EPSILON {
            return self.center + Vec3::X * self.radii.x;
        }
        self.center + (unit / length) * self.radii
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.center += offset;
    }
}

impl Capsule {
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let core = closest_point_on_segment(self.start, self.end, point);
        radial_surface_point(core, self.radius, point)
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.start += offset;
        self.end += offset;
    }
}

impl Shape {
    /// Closest point on the boundary of this shape to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Aabb(aabb) => aabb.closest_point(point),
            Shape::AabbExtent(aabbe) => aabbe.closest_point(point),
            Shape::Obb(obb) => obb.closest_point(point),
            Shape::Sphere(sphere) => sphere.closest_point(point),
            Shape::Ellipsoid(ellipsoid) => ellipsoid.closest_point(point),
            Shape::Capsule(capsule) => capsule.closest_point(point),
        }
    }

    /// Canonical centre used for contact projection and sweep distances.
    pub fn reference_point(&self) -> Vec3 {
        match self {
            Shape::Aabb(aabb) => aabb.center(),
            Shape::AabbExtent(aabbe) => aabbe.center,
            Shape::Obb(obb) => obb.center,
            Shape::Sphere(sphere) => sphere.center,
            Shape::Ellipsoid(ellipsoid) => ellipsoid.center,
            Shape::Capsule(capsule) => capsule.midpoint(),
        }
    }

    pub fn translate(&mut self, offset: Vec3) {
        match self {
            Shape::Aabb(aabb) => aabb.translate(offset),
            Shape::AabbExtent(aabbe) => aabbe.translate(offset),
            Shape::Obb(obb) => obb.translate(offset),
            Shape::Sphere(sphere) => sphere.translate(offset),
            Shape::Ellipsoid(ellipsoid) => ellipsoid.translate(offset),
            Shape::Capsule(capsule) => capsule.translate(offset),
        }
    }

    /// Per-axis half-size of the world-space box enclosing this shape.
    pub fn half_extents(&self) -> Vec3 {
        match self {
            Shape::Aabb(aabb) => aabb.half_extents(),
            Shape::AabbExtent(aabbe) => aabbe.extent,
            Shape::Obb(obb) => obb.world_half_extents(),
            Shape::Sphere(sphere) => Vec3::splat(sphere.radius),
            Shape::Ellipsoid(ellipsoid) => ellipsoid.radii,
            Shape::Capsule(capsule) => {
                (capsule.end - capsule.start).abs() * 0.5 + Vec3::splat(capsule.radius)
            }
        }
    }

    /// Per-axis size that gates the sweep and pads the swept box. Corner boxes
    /// use their full size, every other kind its half-size.
    pub fn sweep_extent(&self) -> Vec3 {
        match self {
            Shape::Aabb(aabb) => aabb.max - aabb.min,
            _ => self.half_extents(),
        }
    }
}
