//! Collision World – swept penetration resolution for real-time 3D simulation code.
//!
//! A [`CollisionWorld`] holds owned or borrowed shapes. Simulation code moves a
//! query shape, then calls [`CollisionWorld::collide`] with the step velocity.
//! The world sweeps fast movers so they cannot tunnel through thin geometry,
//! then repeatedly resolves overlaps by handing push vectors to the query's
//! response callback.

pub mod collision;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::{Quat, Vec3};

pub use collision::{
    queries::{CollisionQuery, CollisionResponse},
    registry::ShapeRegistry,
};
pub use config::CollisionConfig;
pub use crate::core::shapes::{Aabb, AabbExtent, Capsule, Ellipsoid, Obb, Shape, ShapeKind, Sphere};
pub use error::CollisionError;
pub use utils::profiling::{CollisionStats, StatsSnapshot};
pub use world::{CollisionHandle, CollisionWorld, WorldId};
