//! Winding-aware boundary offsets.
//!
//! Authored loops may run either way round, so the outward side is derived
//! from the shoelace signed area instead of being assumed.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::engine::math;

use super::computed::PathPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

impl Winding {
    /// Zero area (degenerate loop) counts as counter-clockwise.
    pub fn from_signed_area(area: f32) -> Self {
        if area >= 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }

    /// Sign applied to the +90° normal to point away from the enclosed area.
    /// Counter-clockwise loops enclose their left side, so outward is right.
    pub fn outward_sign(self) -> f32 {
        match self {
            Winding::CounterClockwise => -1.0,
            Winding::Clockwise => 1.0,
        }
    }
}

/// Shoelace signed area; positive for counter-clockwise loops.
pub fn signed_area(points: &[(f32, f32)]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.0 as f64 * b.1 as f64 - b.0 as f64 * a.1 as f64
        })
        .sum();
    (twice * 0.5) as f32
}

/// Outward unit normal at a centerline sample.
pub fn outward_normal(point: &PathPoint, winding: Winding) -> (f32, f32) {
    math::from_angle(point.angle + winding.outward_sign() * FRAC_PI_2)
}

/// Returns `(outer, inner)`, both the same length as `path`, each offset by
/// half the local width on opposite sides.
pub fn offset_boundaries(path: &[PathPoint], winding: Winding) -> (Vec<(f32, f32)>, Vec<(f32, f32)>) {
    path.iter()
        .map(|p| {
            let normal = outward_normal(p, winding);
            let half = p.width * 0.5;
            (
                (p.position.0 + normal.0 * half, p.position.1 + normal.1 * half),
                (p.position.0 - normal.0 * half, p.position.1 - normal.1 * half),
            )
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunoffType;

    fn point(x: f32, y: f32, angle: f32, width: f32) -> PathPoint {
        PathPoint {
            position: (x, y),
            angle,
            width,
            progress: 0.0,
            runoff: RunoffType::Tarmac,
            kerb: false,
            drs: false,
            sector: None,
        }
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        assert!((signed_area(&ccw) - 100.0).abs() < 1e-3);
        let mut cw = ccw;
        cw.reverse();
        assert!((signed_area(&cw) + 100.0).abs() < 1e-3);
        assert_eq!(signed_area(&ccw[..2]), 0.0);
    }

    #[test]
    fn test_outward_side_for_ccw() {
        // Bottom edge of a CCW square heads +x; outside is -y.
        let p = point(5.0, 0.0, 0.0, 10.0);
        let (outer, inner) = offset_boundaries(&[p], Winding::CounterClockwise);
        assert!((outer[0].1 + 5.0).abs() < 1e-5);
        assert!((inner[0].1 - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_outward_side_flips_for_cw() {
        let p = point(5.0, 0.0, 0.0, 10.0);
        let (outer, inner) = offset_boundaries(&[p], Winding::Clockwise);
        assert!((outer[0].1 - 5.0).abs() < 1e-5);
        assert!((inner[0].1 + 5.0).abs() < 1e-5);
    }
}
