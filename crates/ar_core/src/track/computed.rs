//! Immutable derived track geometry.

use serde::{Deserialize, Serialize};

use crate::config::GeometryConfig;
use crate::engine::containment::BoundarySample;
use crate::engine::math;
use crate::error::Result;
use crate::models::{RunoffType, TrackDescription};

use super::boundary::{self, Winding};
use super::kerbs::{self, KerbStrip};
use super::racing_line::{self, RacingLine, RacingLineVariant};
use super::spline;

/// One dense centerline sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub position: (f32, f32),
    /// Tangent heading, radians
    pub angle: f32,
    pub width: f32,
    /// Fraction of the lap, 0..1
    pub progress: f32,
    pub runoff: RunoffType,
    pub kerb: bool,
    pub drs: bool,
    pub sector: Option<u8>,
}

/// Progress range flagged for drag reduction. `end < start` when the zone
/// crosses the start/finish seam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrsZone {
    pub start: f32,
    pub end: f32,
}

/// Geometry built once per track load and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedTrack {
    pub id: String,
    pub name: String,
    pub laps: u32,
    pub path: Vec<PathPoint>,
    pub outer_boundary: Vec<(f32, f32)>,
    pub inner_boundary: Vec<(f32, f32)>,
    pub kerbs: Vec<KerbStrip>,
    /// One line per [`RacingLineVariant`], in `RacingLineVariant::ALL` order
    pub racing_lines: Vec<RacingLine>,
    pub total_length: f32,
    pub winding: Winding,
    /// Path index of the start/finish control point
    pub start_index: usize,
    pub drs_zones: Vec<DrsZone>,
    /// `(sector, path index)` where each authored sector begins
    pub sector_starts: Vec<(u8, usize)>,
}

/// Builds track geometry with default parameters.
pub fn build(desc: &TrackDescription) -> Result<ComputedTrack> {
    build_with_config(desc, &GeometryConfig::default())
}

/// Validates `desc`, then derives centerline, boundaries, kerbs and racing
/// lines. Pure and deterministic.
pub fn build_with_config(desc: &TrackDescription, cfg: &GeometryConfig) -> Result<ComputedTrack> {
    desc.validate()?;

    let samples = cfg.samples_per_segment.max(1);
    let path = spline::sample_centerline(desc, samples);

    let positions: Vec<(f32, f32)> = path.iter().map(|p| p.position).collect();
    let area = boundary::signed_area(&positions);
    let winding = Winding::from_signed_area(area);
    let (outer_boundary, inner_boundary) = boundary::offset_boundaries(&path, winding);

    let kerbs = kerbs::build_kerbs(&path, &outer_boundary, &inner_boundary, cfg.kerb_width_fraction);
    let racing_lines = RacingLineVariant::ALL
        .iter()
        .map(|&variant| racing_line::build_racing_line(&path, variant, cfg))
        .collect();

    let n = positions.len();
    let total_length = (0..n).map(|i| math::distance(positions[i], positions[(i + 1) % n])).sum();

    let track = ComputedTrack {
        id: desc.id.clone(),
        name: desc.name.clone(),
        laps: desc.laps,
        drs_zones: drs_zones(&path),
        sector_starts: sector_starts(&path),
        path,
        outer_boundary,
        inner_boundary,
        kerbs,
        racing_lines,
        total_length,
        winding,
        start_index: desc.start_index * samples,
    };

    log::debug!(
        "Built track '{}': {} samples, length {:.1}, {:?}, {} kerb strips",
        track.id,
        track.path.len(),
        track.total_length,
        track.winding,
        track.kerbs.len()
    );
    Ok(track)
}

fn drs_zones(path: &[PathPoint]) -> Vec<DrsZone> {
    let n = path.len();
    let mut zones = Vec::new();
    let mut start: Option<usize> = None;
    for i in 0..n {
        match (path[i].drs, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                zones.push(DrsZone { start: path[s].progress, end: path[i - 1].progress });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        let end = path[n - 1].progress;
        // Merge with a zone that began at the seam.
        match zones.first_mut() {
            Some(first) if path[0].drs && s > 0 => first.start = path[s].progress,
            _ => zones.push(DrsZone { start: path[s].progress, end }),
        }
    }
    zones
}

fn sector_starts(path: &[PathPoint]) -> Vec<(u8, usize)> {
    let mut starts = Vec::new();
    let mut previous: Option<u8> = None;
    for (i, p) in path.iter().enumerate() {
        if let Some(sector) = p.sector {
            if previous != Some(sector) && !starts.iter().any(|&(s, _)| s == sector) {
                starts.push((sector, i));
            }
            previous = Some(sector);
        }
    }
    starts
}

impl ComputedTrack {
    pub fn racing_line(&self, variant: RacingLineVariant) -> Option<&RacingLine> {
        self.racing_lines.iter().find(|line| line.variant == variant)
    }

    /// Centerline with per-sample half-width, as used by containment.
    pub fn boundary_samples(&self) -> Vec<BoundarySample> {
        self.path
            .iter()
            .map(|p| BoundarySample { position: p.position, half_width: p.width * 0.5 })
            .collect()
    }

    /// Closest centerline sample. Linear scan.
    pub fn nearest_path_index(&self, position: (f32, f32)) -> usize {
        self.path
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                math::distance_sq(a.position, position).total_cmp(&math::distance_sq(b.position, position))
            })
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Lap fraction of the nearest sample, measured from the start line.
    pub fn progress_at(&self, position: (f32, f32)) -> f32 {
        if self.path.is_empty() {
            return 0.0;
        }
        let raw = self.path[self.nearest_path_index(position)].progress;
        let start = self.path[self.start_index.min(self.path.len() - 1)].progress;
        let progress = (raw - start).rem_euclid(1.0);
        if progress >= 1.0 {
            0.0
        } else {
            progress
        }
    }

    pub fn in_drs_zone(&self, progress: f32) -> bool {
        self.drs_zones.iter().any(|zone| {
            if zone.start <= zone.end {
                progress >= zone.start && progress <= zone.end
            } else {
                progress >= zone.start || progress <= zone.end
            }
        })
    }
}
