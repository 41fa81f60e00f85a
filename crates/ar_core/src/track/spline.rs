//! Closed-loop Catmull-Rom centerline sampling.

use crate::engine::math::{self, EPSILON};
use crate::models::TrackDescription;

use super::computed::PathPoint;

/// Uniform Catmull-Rom position between `p1` (t = 0) and `p2` (t = 1).
pub fn catmull_rom(
    p0: (f32, f32),
    p1: (f32, f32),
    p2: (f32, f32),
    p3: (f32, f32),
    t: f32,
) -> (f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;
    let axis = |a: f32, b: f32, c: f32, d: f32| {
        0.5 * (2.0 * b
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    (axis(p0.0, p1.0, p2.0, p3.0), axis(p0.1, p1.1, p2.1, p3.1))
}

/// Analytic derivative of [`catmull_rom`] with respect to `t`.
pub fn catmull_rom_tangent(
    p0: (f32, f32),
    p1: (f32, f32),
    p2: (f32, f32),
    p3: (f32, f32),
    t: f32,
) -> (f32, f32) {
    let t2 = t * t;
    let axis = |a: f32, b: f32, c: f32, d: f32| {
        0.5 * ((-a + c)
            + 2.0 * (2.0 * a - 5.0 * b + 4.0 * c - d) * t
            + 3.0 * (-a + 3.0 * b - 3.0 * c + d) * t2)
    };
    (axis(p0.0, p1.0, p2.0, p3.0), axis(p0.1, p1.1, p2.1, p3.1))
}

/// Samples the closed centerline. Expects a validated description.
///
/// Segment `i` runs from control point `i` to `i + 1` and is shaped by
/// `i - 1` and `i + 2`, all indices wrapped so the loop closes. Width is
/// interpolated; categorical metadata comes from the nearer control point.
pub fn sample_centerline(desc: &TrackDescription, samples_per_segment: usize) -> Vec<PathPoint> {
    let points = &desc.control_points;
    let n = points.len();
    let samples = samples_per_segment.max(1);
    let mut path = Vec::with_capacity(n * samples);
    let mut last_angle = 0.0_f32;

    for i in 0..n {
        let i0 = (i + n - 1) % n;
        let i2 = (i + 1) % n;
        let i3 = (i + 2) % n;
        let (p0, p1, p2, p3) =
            (points[i0].position(), points[i].position(), points[i2].position(), points[i3].position());
        let (w1, w2) = (desc.width_at(i), desc.width_at(i2));

        for k in 0..samples {
            let t = k as f32 / samples as f32;
            let position = catmull_rom(p0, p1, p2, p3, t);

            let mut tangent = catmull_rom_tangent(p0, p1, p2, p3, t);
            if math::length(tangent) < EPSILON {
                // Coincident neighbours: fall back to the chord.
                tangent = (p2.0 - p1.0, p2.1 - p1.1);
            }
            let angle = if math::length(tangent) < EPSILON {
                last_angle
            } else {
                tangent.1.atan2(tangent.0)
            };
            last_angle = angle;

            let nearest = if t >= 0.5 { &points[i2] } else { &points[i] };
            path.push(PathPoint {
                position,
                angle,
                width: math::lerp(w1, w2, t),
                progress: (i as f32 + t) / n as f32,
                runoff: nearest.runoff.unwrap_or_default(),
                kerb: nearest.kerb,
                drs: nearest.drs,
                sector: nearest.sector,
            });
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ControlPoint;

    fn square(width: f32) -> TrackDescription {
        TrackDescription::new(
            "square",
            "Square",
            width,
            vec![
                ControlPoint::new(0.0, 0.0),
                ControlPoint::new(400.0, 0.0).with_width(80.0).with_kerb(),
                ControlPoint::new(400.0, 400.0).with_sector(2),
                ControlPoint::new(0.0, 400.0),
            ],
        )
    }

    #[test]
    fn test_curve_passes_through_control_points() {
        let p = catmull_rom((0.0, 0.0), (10.0, 0.0), (20.0, 5.0), (30.0, 5.0), 0.0);
        assert!((p.0 - 10.0).abs() < 1e-5 && p.1.abs() < 1e-5);
        let p = catmull_rom((0.0, 0.0), (10.0, 0.0), (20.0, 5.0), (30.0, 5.0), 1.0);
        assert!((p.0 - 20.0).abs() < 1e-4 && (p.1 - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_tangent_matches_finite_difference() {
        let (p0, p1, p2, p3) = ((0.0, 0.0), (10.0, 3.0), (25.0, -4.0), (40.0, 8.0));
        let t = 0.37;
        let h = 1e-3;
        let a = catmull_rom(p0, p1, p2, p3, t - h);
        let b = catmull_rom(p0, p1, p2, p3, t + h);
        let numeric = ((b.0 - a.0) / (2.0 * h), (b.1 - a.1) / (2.0 * h));
        let analytic = catmull_rom_tangent(p0, p1, p2, p3, t);
        assert!((numeric.0 - analytic.0).abs() < 0.05);
        assert!((numeric.1 - analytic.1).abs() < 0.05);
    }

    #[test]
    fn test_sample_count_and_progress() {
        let path = sample_centerline(&square(60.0), 10);
        assert_eq!(path.len(), 40);
        assert_eq!(path[0].progress, 0.0);
        assert!((path[10].progress - 0.25).abs() < 1e-6);
        assert!(path.iter().all(|p| p.progress < 1.0));
    }

    #[test]
    fn test_width_interpolation_and_metadata() {
        let path = sample_centerline(&square(60.0), 10);
        // Halfway along segment 0: width between 60 and 80
        assert!((path[5].width - 70.0).abs() < 1e-4);
        // t < 0.5 takes control point 0's flags, t >= 0.5 takes point 1's
        assert!(!path[4].kerb);
        assert!(path[5].kerb);
        assert_eq!(path[15].sector, Some(2));
    }

    #[test]
    fn test_coincident_points_do_not_panic() {
        let desc = TrackDescription::new(
            "degenerate",
            "Degenerate",
            40.0,
            vec![ControlPoint::new(5.0, 5.0), ControlPoint::new(5.0, 5.0), ControlPoint::new(5.0, 5.0)],
        );
        let path = sample_centerline(&desc, 8);
        assert_eq!(path.len(), 24);
        assert!(path.iter().all(|p| p.angle.is_finite() && p.position.0.is_finite()));
    }
}
