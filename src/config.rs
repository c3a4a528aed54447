//! Global configuration constants and per-world tuning for the collision engine.

use serde::{Deserialize, Serialize};

/// Number of packets that may be in flight (or rejected) before new queries are refused.
pub const DEFAULT_MAX_PACKET_DEPTH: u32 = 20;

/// Upper bound on resolve passes performed by a single query.
pub const DEFAULT_MAX_RESOLVE_ITERATIONS: u32 = 20;

/// Distance bias added to every sweep candidate before ranking.
pub const DEFAULT_SWEEP_DISTANCE_BIAS: f32 = 1.0;

/// Fraction of the mover's extent a step must exceed on some axis to trigger a sweep.
pub const DEFAULT_SWEEP_TRIGGER_RATIO: f32 = 0.5;

/// Tuning knobs for a [`CollisionWorld`](crate::world::CollisionWorld).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub max_packet_depth: u32,
    pub max_resolve_iterations: u32,
    pub sweep_distance_bias: f32,
    pub sweep_trigger_ratio: f32,
    /// Hard cap on registered primitives; `None` means unbounded.
    pub max_primitives: Option<usize>,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            max_packet_depth: DEFAULT_MAX_PACKET_DEPTH,
            max_resolve_iterations: DEFAULT_MAX_RESOLVE_ITERATIONS,
            sweep_distance_bias: DEFAULT_SWEEP_DISTANCE_BIAS,
            sweep_trigger_ratio: DEFAULT_SWEEP_TRIGGER_RATIO,
            max_primitives: None,
        }
    }
}

impl CollisionConfig {
    pub fn builder() -> CollisionConfigBuilder {
        CollisionConfigBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct CollisionConfigBuilder {
    config: CollisionConfig,
}

impl CollisionConfigBuilder {
    pub fn max_packet_depth(mut self, depth: u32) -> Self {
        self.config.max_packet_depth = depth;
        self
    }

    pub fn max_resolve_iterations(mut self, iterations: u32) -> Self {
        self.config.max_resolve_iterations = iterations;
        self
    }

    pub fn sweep_distance_bias(mut self, bias: f32) -> Self {
        self.config.sweep_distance_bias = bias;
        self
    }

    pub fn sweep_trigger_ratio(mut self, ratio: f32) -> Self {
        self.config.sweep_trigger_ratio = ratio;
        self
    }

    pub fn max_primitives(mut self, limit: usize) -> Self {
        self.config.max_primitives = Some(limit);
        self
    }

    pub fn build(self) -> CollisionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: CollisionConfig = toml::from_str(
            r#"
            max_resolve_iterations = 8
            max_primitives = 256
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.max_resolve_iterations, 8);
        assert_eq!(config.max_primitives, Some(256));
        assert_eq!(config.max_packet_depth, DEFAULT_MAX_PACKET_DEPTH);
        assert_eq!(config.sweep_distance_bias, DEFAULT_SWEEP_DISTANCE_BIAS);
    }

    #[test]
    fn builder_overrides_individual_fields() {
        let config = CollisionConfig::builder()
            .max_packet_depth(4)
            .sweep_trigger_ratio(0.25)
            .build();

        assert_eq!(config.max_packet_depth, 4);
        assert_eq!(config.sweep_trigger_ratio, 0.25);
        assert_eq!(config.max_resolve_iterations, DEFAULT_MAX_RESOLVE_ITERATIONS);
        assert!(config.max_primitives.is_none());
    }
}
