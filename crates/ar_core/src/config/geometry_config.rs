//! Geometry build parameters

use serde::{Deserialize, Serialize};

/// Spline sampling, kerb and racing-line parameters used by `track::build`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Samples per Catmull-Rom segment (default: 20)
    pub samples_per_segment: usize,
    /// Kerb strip depth as a fraction of local track width (default: 0.08)
    pub kerb_width_fraction: f32,

    // === Racing line ===
    /// Curvature → speed factor slope (default: 50.0)
    pub curvature_speed_scale: f32,
    /// Speed factor floor for the tightest corners (default: 0.25)
    pub min_speed_factor: f32,
    /// Curvature → lateral offset slope, saturates at 1.0 (default: 60.0)
    pub cut_in_scale: f32,
    /// Optimal line: max cut-in as a fraction of half-width (default: 0.6)
    pub optimal_cut_in: f32,
    /// Inside line: max cut-in as a fraction of half-width (default: 0.85)
    pub inside_cut_in: f32,
    /// Inside line: offset held even in gentle bends (default: 0.2)
    pub inside_base_offset: f32,
    /// Inside line speed multiplier (default: 0.92)
    pub inside_speed_penalty: f32,
    /// Outside line: max offset toward the outside of a bend (default: 0.6)
    pub outside_offset: f32,
    /// Outside line speed multiplier (default: 0.97)
    pub outside_speed_penalty: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            samples_per_segment: 20,
            kerb_width_fraction: 0.08,

            curvature_speed_scale: 50.0,
            min_speed_factor: 0.25,
            cut_in_scale: 60.0,
            optimal_cut_in: 0.6,
            inside_cut_in: 0.85,
            inside_base_offset: 0.2,
            inside_speed_penalty: 0.92,
            outside_offset: 0.6,
            outside_speed_penalty: 0.97,
        }
    }
}
