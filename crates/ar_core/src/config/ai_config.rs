//! AI driver tuning

use serde::{Deserialize, Serialize};

/// Constants for the AI control law. Probabilities are per tick at 60 Hz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    // === Target selection ===
    /// Steering lookahead at standstill, in world units (default: 60.0)
    pub lookahead_base: f32,
    /// Extra lookahead per unit of speed, in seconds (default: 0.3)
    pub lookahead_speed_factor: f32,

    // === Steering ===
    /// Heading dead-zone for a perfect driver, radians (default: 0.03)
    pub steer_threshold_min: f32,
    /// Dead-zone added at zero skill, radians (default: 0.15)
    pub steer_threshold_skill_range: f32,
    /// Chance to skip a correction at zero skill (default: 0.15)
    pub under_correct_chance: f32,
    /// Skill below which steering may be inverted (default: 0.4)
    pub invert_skill_ceiling: f32,
    /// Chance to invert steering at zero skill (default: 0.05)
    pub invert_chance: f32,

    // === Speed control ===
    /// Braking scan at standstill, in world units (default: 80.0)
    pub brake_lookahead_base: f32,
    /// Extra braking scan per unit of speed, in seconds (default: 0.9)
    pub brake_lookahead_speed_factor: f32,
    /// Speed ratio tolerated above the target before braking (default: 0.05)
    pub speed_margin: f32,
    /// Chance of pressing throttle while braking at zero skill (default: 0.08)
    pub panic_brake_chance: f32,
    /// Throttle probability at zero aggressiveness (default: 0.7)
    pub base_throttle_chance: f32,
    /// Heading error treated as hard steering, radians (default: 0.45)
    pub hard_steer_error: f32,
    /// Speed ratio above which hard steering lifts the throttle (default: 0.85)
    pub hard_steer_speed_ratio: f32,

    // === Mistakes ===
    /// Per-type trigger chance at zero skill (default: 0.004)
    pub mistake_base_chance: f32,
    /// Upcoming speed factor below which the car counts as cornering (default: 0.75)
    pub corner_speed_factor: f32,

    // === Overtaking ===
    /// Closest car considered for a pass (default: 15.0)
    pub overtake_min_distance: f32,
    /// Furthest car considered for a pass (default: 180.0)
    pub overtake_max_distance: f32,
    /// Cosine of the forward cone half-angle (default: 0.8)
    pub overtake_cone_cos: f32,
    /// Speed advantage needed to commit (default: 8.0)
    pub overtake_speed_margin: f32,
    /// Commit duration at zero aggressiveness, ticks (default: 60)
    pub overtake_commit_base_ticks: u32,
    /// Commit duration added at full aggressiveness, ticks (default: 120)
    pub overtake_commit_aggression_ticks: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            lookahead_base: 60.0,
            lookahead_speed_factor: 0.3,

            steer_threshold_min: 0.03,
            steer_threshold_skill_range: 0.15,
            under_correct_chance: 0.15,
            invert_skill_ceiling: 0.4,
            invert_chance: 0.05,

            brake_lookahead_base: 80.0,
            brake_lookahead_speed_factor: 0.9,
            speed_margin: 0.05,
            panic_brake_chance: 0.08,
            base_throttle_chance: 0.7,
            hard_steer_error: 0.45,
            hard_steer_speed_ratio: 0.85,

            mistake_base_chance: 0.004,
            corner_speed_factor: 0.75,

            overtake_min_distance: 15.0,
            overtake_max_distance: 180.0,
            overtake_cone_cos: 0.8,
            overtake_speed_margin: 8.0,
            overtake_commit_base_ticks: 60,
            overtake_commit_aggression_ticks: 120,
        }
    }
}

impl AiConfig {
    /// Tuning with every random imperfection disabled.
    pub fn flawless() -> Self {
        Self {
            under_correct_chance: 0.0,
            invert_chance: 0.0,
            panic_brake_chance: 0.0,
            base_throttle_chance: 1.0,
            mistake_base_chance: 0.0,
            ..Self::default()
        }
    }
}
