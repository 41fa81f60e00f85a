//! Containment and collision tuning

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    // === Track containment ===
    /// Distance kept inside the track edge after a push-back (default: 2.0)
    pub containment_buffer: f32,
    /// Speed multiplier applied on a wall hit (default: 0.5)
    pub wall_speed_penalty: f32,

    // === Vehicle contact ===
    /// Coefficient of restitution between cars (default: 0.3)
    pub restitution: f32,
    /// Extra gap added when separating overlapping cars (default: 0.5)
    pub separation_buffer: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            containment_buffer: 2.0,
            wall_speed_penalty: 0.5,
            restitution: 0.3,
            separation_buffer: 0.5,
        }
    }
}
