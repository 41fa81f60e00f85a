//! Kerb strips along kerb-flagged runs of the centerline.
//!
//! Each strip is kept as per-edge quads; a single polygon over a whole run
//! folds into self-intersecting wedges at tight corners. The outline polygon
//! is still provided for hit tests and debug drawing.

use serde::{Deserialize, Serialize};

use crate::engine::math;

use super::computed::PathPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KerbSide {
    Outer,
    Inner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KerbStrip {
    pub side: KerbSide,
    /// Path indices covered, in travel order (may wrap past the seam)
    pub indices: Vec<usize>,
    /// Boundary points forward, then the pushed-out points reversed
    pub polygon: Vec<(f32, f32)>,
    /// `[b_i, b_i+1, o_i+1, o_i]` per edge of the run
    pub quads: Vec<[(f32, f32); 4]>,
}

/// Maximal runs of kerb-flagged samples. A run touching both ends of the
/// path is merged across the seam.
pub fn kerb_runs(path: &[PathPoint]) -> Vec<Vec<usize>> {
    let mut runs: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();

    for (i, p) in path.iter().enumerate() {
        if p.kerb {
            current.push(i);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    let n = path.len();
    if runs.len() > 1 && runs[0][0] == 0 && runs.last().and_then(|r| r.last()) == Some(&(n - 1)) {
        let head = runs.remove(0);
        if let Some(tail) = runs.last_mut() {
            tail.extend(head);
        }
    }
    runs
}

fn build_strip(
    side: KerbSide,
    run: &[usize],
    path: &[PathPoint],
    boundary: &[(f32, f32)],
    depth_fraction: f32,
) -> KerbStrip {
    let base: Vec<(f32, f32)> = run.iter().map(|&i| boundary[i]).collect();
    let pushed: Vec<(f32, f32)> = run
        .iter()
        .map(|&i| {
            let center = path[i].position;
            let b = boundary[i];
            // Away from the centerline, whichever edge this is.
            let dir = math::normalize((b.0 - center.0, b.1 - center.1));
            let depth = path[i].width * depth_fraction;
            (b.0 + dir.0 * depth, b.1 + dir.1 * depth)
        })
        .collect();

    let quads = (0..base.len().saturating_sub(1))
        .map(|k| [base[k], base[k + 1], pushed[k + 1], pushed[k]])
        .collect();

    let mut polygon = base;
    polygon.extend(pushed.iter().rev());

    KerbStrip { side, indices: run.to_vec(), polygon, quads }
}

/// One outer and one inner strip per kerb run of two or more samples.
pub fn build_kerbs(
    path: &[PathPoint],
    outer: &[(f32, f32)],
    inner: &[(f32, f32)],
    depth_fraction: f32,
) -> Vec<KerbStrip> {
    kerb_runs(path)
        .iter()
        .filter(|run| run.len() >= 2)
        .flat_map(|run| {
            [
                build_strip(KerbSide::Outer, run, path, outer, depth_fraction),
                build_strip(KerbSide::Inner, run, path, inner, depth_fraction),
            ]
        })
        .collect()
}
