use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box stored as its two corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn to_extent(&self) -> AabbExtent {
        let extent = self.half_extents();
        AabbExtent {
            center: self.min + extent,
            extent,
        }
    }
}

/// Axis-aligned box stored as a center and per-axis half-size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AabbExtent {
    pub center: Vec3,
    pub extent: Vec3,
}

impl AabbExtent {
    pub fn new(center: Vec3, extent: Vec3) -> Self {
        Self { center, extent }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.extent
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.extent
    }

    pub fn to_aabb(&self) -> Aabb {
        Aabb {
            min: self.min(),
            max: self.max(),
        }
    }
}

/// Oriented box: an extent box rotated about its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obb {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub rotation: Quat,
}

impl Obb {
    pub fn new(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// World-space local axes (columns of the rotation).
    pub fn axes(&self) -> [Vec3; 3] {
        [
            self.rotation * Vec3::X,
            self.rotation * Vec3::Y,
            self.rotation * Vec3::Z,
        ]
    }

    /// Half-size of the world-space box enclosing this OBB.
    pub fn world_half_extents(&self) -> Vec3 {
        let [x, y, z] = self.axes();
        x.abs() * self.half_extents.x + y.abs() * self.half_extents.y + z.abs() * self.half_extents.z
    }
}

impl From<AabbExtent> for Obb {
    fn from(aabbe: AabbExtent) -> Self {
        Self::new(aabbe.center, aabbe.extent, Quat::IDENTITY)
    }
}

impl From<Aabb> for Obb {
    fn from(aabb: Aabb) -> Self {
        aabb.to_extent().into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Axis-aligned ellipsoid with per-axis radii.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    pub center: Vec3,
    pub radii: Vec3,
}

impl Ellipsoid {
    pub fn new(center: Vec3, radii: Vec3) -> Self {
        Self { center, radii }
    }
}

/// Segment from `start` to `end` inflated by `radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl Capsule {
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }
}

/// Shape kinds known to the collision registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeKind {
    Aabb,
    AabbExtent,
    Obb,
    Sphere,
    Ellipsoid,
    Capsule,
}

impl ShapeKind {
    pub const COUNT: usize = 6;

    pub const ALL: [ShapeKind; Self::COUNT] = [
        ShapeKind::Aabb,
        ShapeKind::AabbExtent,
        ShapeKind::Obb,
        ShapeKind::Sphere,
        ShapeKind::Ellipsoid,
        ShapeKind::Capsule,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Aabb => "AABB",
            ShapeKind::AabbExtent => "AABBE",
            ShapeKind::Obb => "OBB",
            ShapeKind::Sphere => "SPHERE",
            ShapeKind::Ellipsoid => "ELLIPSOID",
            ShapeKind::Capsule => "CAPSULE",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tagged collision volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Aabb(Aabb),
    AabbExtent(AabbExtent),
    Obb(Obb),
    Sphere(Sphere),
    Ellipsoid(Ellipsoid),
    Capsule(Capsule),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Aabb(_) => ShapeKind::Aabb,
            Shape::AabbExtent(_) => ShapeKind::AabbExtent,
            Shape::Obb(_) => ShapeKind::Obb,
            Shape::Sphere(_) => ShapeKind::Sphere,
            Shape::Ellipsoid(_) => ShapeKind::Ellipsoid,
            Shape::Capsule(_) => ShapeKind::Capsule,
        }
    }

    pub fn as_aabb(&self) -> Option<&Aabb> {
        match self {
            Shape::Aabb(aabb) => Some(aabb),
            _ => None,
        }
    }

    pub fn aabb(min: Vec3, max: Vec3) -> Self {
        Shape::Aabb(Aabb::new(min, max))
    }

    pub fn aabb_extent(center: Vec3, extent: Vec3) -> Self {
        Shape::AabbExtent(AabbExtent::new(center, extent))
    }

    pub fn obb(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Shape::Obb(Obb::new(center, half_extents, rotation))
    }

    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Shape::Sphere(Sphere::new(center, radius))
    }

    pub fn ellipsoid(center: Vec3, radii: Vec3) -> Self {
        Shape::Ellipsoid(Ellipsoid::new(center, radii))
    }

    pub fn capsule(start: Vec3, end: Vec3, radius: f32) -> Self {
        Shape::Capsule(Capsule::new(start, end, radius))
    }
}

impl From<Aabb> for Shape {
    fn from(aabb: Aabb) -> Self {
        Shape::Aabb(aabb)
    }
}

impl From<AabbExtent> for Shape {
    fn from(aabbe: AabbExtent) -> Self {
        Shape::AabbExtent(aabbe)
    }
}

impl From<Obb> for Shape {
    fn from(obb: Obb) -> Self {
        Shape::Obb(obb)
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Ellipsoid> for Shape {
    fn from(ellipsoid: Ellipsoid) -> Self {
        Shape::Ellipsoid(ellipsoid)
    }
}

impl From<Capsule> for Shape {
    fn from(capsule: Capsule) -> Self {
        Shape::Capsule(capsule)
    }
}
