//! Fixed-step timing

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestepConfig {
    /// Integration step in seconds (default: 1/60)
    pub fixed_dt: f32,
    /// Largest frame delta fed into the accumulator (default: 0.25)
    pub max_frame_dt: f32,
    /// Upper bound on fixed steps per frame (default: 8)
    pub max_steps_per_frame: u32,
    /// Largest dt a single `Simulation::tick` accepts (default: 0.1)
    pub max_step_dt: f32,
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_frame_dt: 0.25,
            max_steps_per_frame: 8,
            max_step_dt: 0.1,
        }
    }
}
