//! Core geometry types describing collision volumes.

pub mod shapes;

pub use shapes::{Aabb, AabbExtent, Capsule, Ellipsoid, Obb, Shape, ShapeKind, Sphere};
