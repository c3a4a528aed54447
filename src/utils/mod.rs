//! Utility helpers: pools, packet tracing, math extensions and query telemetry.

pub mod allocator;
pub mod logging;
pub mod math;
pub mod profiling;

pub use allocator::{Pool, PoolIndex};
pub use profiling::{CollisionStats, StatsSnapshot};
