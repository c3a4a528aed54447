//! Collision detection modules: shape operations, pair tests, dispatch registry, contacts, sweeps, queries.

pub mod shapes;
pub mod intersection;
pub mod registry;
pub mod contact;
pub mod ccd;
pub mod queries;

pub use ccd::SweepVolume;
pub use contact::{ContactResolver, ShapeContact};
pub use intersection::Intersection;
pub use queries::{CollisionQuery, CollisionResponse};
pub use registry::ShapeRegistry;
