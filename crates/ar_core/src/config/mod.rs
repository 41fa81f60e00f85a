//! # Engine Configuration
//!
//! All tuning constants for geometry, contact physics, AI and timing live
//! here so balance changes never touch the algorithms.
//!
//! ```rust
//! use ar_core::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let arcade = EngineConfig::arcade();
//! assert!(arcade.physics.wall_speed_penalty > config.physics.wall_speed_penalty);
//! ```

mod ai_config;
mod geometry_config;
mod physics_config;
mod timestep_config;

pub use ai_config::AiConfig;
pub use geometry_config::GeometryConfig;
pub use physics_config::PhysicsConfig;
pub use timestep_config::TimestepConfig;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub timestep: TimestepConfig,
}

impl EngineConfig {
    /// Forgiving walls and bouncier contact.
    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.physics.wall_speed_penalty = 0.7;
        cfg.physics.restitution = 0.4;
        cfg.ai.mistake_base_chance = 0.002;
        cfg
    }

    /// For tests: AI drivers never roll a random imperfection.
    pub fn deterministic() -> Self {
        Self { ai: AiConfig::flawless(), ..Self::default() }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.geometry.samples_per_segment, 20);
        assert!((cfg.physics.restitution - 0.3).abs() < 1e-6);
        assert!((cfg.timestep.fixed_dt - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_arcade_is_more_forgiving() {
        let base = EngineConfig::default();
        let arcade = EngineConfig::arcade();
        assert!(arcade.physics.wall_speed_penalty > base.physics.wall_speed_penalty);
        assert!(arcade.ai.mistake_base_chance < base.ai.mistake_base_chance);
    }

    #[test]
    fn test_deterministic_has_no_mistakes() {
        let det = EngineConfig::deterministic();
        assert_eq!(det.ai.mistake_base_chance, 0.0);
        assert_eq!(det.ai.invert_chance, 0.0);
        assert_eq!(det.ai.base_throttle_chance, 1.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{"physics": {
            "containment_buffer": 1.0,
            "wall_speed_penalty": 0.25,
            "restitution": 0.1,
            "separation_buffer": 0.0
        }}"#)
        .unwrap();
        assert!((cfg.physics.wall_speed_penalty - 0.25).abs() < 1e-6);
        assert_eq!(cfg.geometry, GeometryConfig::default());
    }

    #[test]
    fn test_config_serialization() {
        let cfg = EngineConfig::arcade();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, cfg);
    }
}
