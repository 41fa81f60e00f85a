//! Racing lines with per-point speed hints.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::config::GeometryConfig;
use crate::engine::math::{self, EPSILON};

use super::computed::PathPoint;

/// Curvature below which a sample counts as straight.
pub(crate) const STRAIGHT_CURVATURE: f32 = 1e-4;

/// Strategy variants the AI can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RacingLineVariant {
    /// Default line: moderate apex cut
    #[default]
    Optimal,
    /// Wide entry, used to go around a car holding the inside
    Outside,
    /// Tight defensive/divebomb line
    Inside,
}

impl RacingLineVariant {
    pub const ALL: [RacingLineVariant; 3] =
        [RacingLineVariant::Optimal, RacingLineVariant::Outside, RacingLineVariant::Inside];

    pub fn as_str(&self) -> &'static str {
        match self {
            RacingLineVariant::Optimal => "optimal",
            RacingLineVariant::Outside => "outside",
            RacingLineVariant::Inside => "inside",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RacingLinePoint {
    pub position: (f32, f32),
    /// Suggested fraction of top speed, 0..1
    pub speed_factor: f32,
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacingLine {
    pub variant: RacingLineVariant,
    pub points: Vec<RacingLinePoint>,
}

impl RacingLine {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the point closest to `position`. Linear scan.
    pub fn nearest_index(&self, position: (f32, f32)) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                math::distance_sq(a.position, position).total_cmp(&math::distance_sq(b.position, position))
            })
            .map(|(i, _)| i)
    }

    /// Walks forward from `start` until at least `distance` has been
    /// covered, wrapping around the loop. Returns the index reached.
    pub fn index_ahead(&self, start: usize, distance: f32) -> usize {
        let n = self.points.len();
        if n == 0 {
            return 0;
        }
        let mut idx = start % n;
        let mut travelled = 0.0;
        for _ in 0..n {
            if travelled >= distance {
                break;
            }
            let next = (idx + 1) % n;
            travelled += math::distance(self.points[idx].position, self.points[next].position);
            idx = next;
        }
        idx
    }

    /// Smallest speed factor between `start` and `distance` ahead, inclusive.
    pub fn min_speed_factor_ahead(&self, start: usize, distance: f32) -> f32 {
        let n = self.points.len();
        if n == 0 {
            return 1.0;
        }
        let end = self.index_ahead(start, distance);
        let mut idx = start % n;
        let mut min = self.points[idx].speed_factor;
        while idx != end {
            idx = (idx + 1) % n;
            min = min.min(self.points[idx].speed_factor);
        }
        min
    }
}

/// Heading change per unit length around sample `i`, signed (positive = left turn).
pub fn signed_curvature(path: &[PathPoint], i: usize) -> f32 {
    let n = path.len();
    if n < 3 {
        return 0.0;
    }
    let prev = &path[(i + n - 1) % n];
    let next = &path[(i + 1) % n];
    let turn = math::normalize_angle(next.angle - prev.angle);
    let span = math::distance(prev.position, next.position).max(EPSILON);
    turn / span
}

/// Fraction of half-width to shift toward the inside of the turn.
/// Negative values move toward the outside.
fn lateral_fraction(variant: RacingLineVariant, curvature: f32, cfg: &GeometryConfig) -> f32 {
    if curvature < STRAIGHT_CURVATURE {
        return 0.0;
    }
    let saturation = (curvature * cfg.cut_in_scale).min(1.0);
    match variant {
        RacingLineVariant::Optimal => saturation * cfg.optimal_cut_in,
        RacingLineVariant::Inside => {
            (saturation * cfg.inside_cut_in + cfg.inside_base_offset).min(cfg.inside_cut_in)
        }
        RacingLineVariant::Outside => -saturation * cfg.outside_offset,
    }
}

fn speed_multiplier(variant: RacingLineVariant, cfg: &GeometryConfig) -> f32 {
    match variant {
        RacingLineVariant::Optimal => 1.0,
        RacingLineVariant::Inside => cfg.inside_speed_penalty,
        RacingLineVariant::Outside => cfg.outside_speed_penalty,
    }
}

/// Builds one racing-line variant, then applies a wrapping 1-2-1 smoothing
/// pass to remove sampling noise.
pub fn build_racing_line(path: &[PathPoint], variant: RacingLineVariant, cfg: &GeometryConfig) -> RacingLine {
    let n = path.len();
    let raw: Vec<RacingLinePoint> = (0..n)
        .map(|i| {
            let p = &path[i];
            let signed = signed_curvature(path, i);
            let curvature = signed.abs();

            let speed_factor = ((1.0 - curvature * cfg.curvature_speed_scale) * speed_multiplier(variant, cfg))
                .clamp(cfg.min_speed_factor, 1.0);

            let turn_sign = if curvature < STRAIGHT_CURVATURE { 0.0 } else { signed.signum() };
            let shift = turn_sign * lateral_fraction(variant, curvature, cfg) * p.width * 0.5;
            let left = math::from_angle(p.angle + FRAC_PI_2);

            RacingLinePoint {
                position: (p.position.0 + left.0 * shift, p.position.1 + left.1 * shift),
                speed_factor,
                progress: p.progress,
            }
        })
        .collect();

    let points = if n < 3 {
        raw
    } else {
        (0..n)
            .map(|i| {
                let prev = &raw[(i + n - 1) % n];
                let cur = &raw[i];
                let next = &raw[(i + 1) % n];
                RacingLinePoint {
                    position: (
                        (prev.position.0 + 2.0 * cur.position.0 + next.position.0) * 0.25,
                        (prev.position.1 + 2.0 * cur.position.1 + next.position.1) * 0.25,
                    ),
                    speed_factor: (prev.speed_factor + 2.0 * cur.speed_factor + next.speed_factor) * 0.25,
                    progress: cur.progress,
                }
            })
            .collect()
    };

    RacingLine { variant, points }
}
