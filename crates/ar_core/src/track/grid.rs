//! Starting grid behind the start/finish line.

use serde::{Deserialize, Serialize};

use crate::engine::math;

use super::computed::ComputedTrack;

/// Gap between the start line and pole position.
pub const GRID_FIRST_OFFSET: f32 = 20.0;
/// Distance between consecutive grid rows.
pub const GRID_ROW_SPACING: f32 = 40.0;
/// Lateral slot offset as a fraction of half-width.
pub const GRID_LATERAL_FRACTION: f32 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSlot {
    pub position: (f32, f32),
    pub rotation: f32,
}

impl ComputedTrack {
    /// Centerline point and heading `distance` behind sample `from`,
    /// interpolated between samples.
    pub fn point_behind(&self, from: usize, distance: f32) -> ((f32, f32), f32) {
        let n = self.path.len();
        if n == 0 {
            return ((0.0, 0.0), 0.0);
        }
        let mut idx = from % n;
        let mut remaining = distance.max(0.0);
        for _ in 0..n {
            let prev = (idx + n - 1) % n;
            let a = self.path[idx].position;
            let b = self.path[prev].position;
            let seg = math::distance(a, b);
            if seg >= remaining && seg > math::EPSILON {
                let t = remaining / seg;
                let pos = (math::lerp(a.0, b.0, t), math::lerp(a.1, b.1, t));
                return (pos, self.path[idx].angle);
            }
            remaining -= seg;
            idx = prev;
        }
        (self.path[idx].position, self.path[idx].angle)
    }

    /// Slot `k` of a two-abreast staggered grid, pole first. Every slot
    /// faces along the track.
    pub fn grid_slot(&self, k: usize) -> Option<GridSlot> {
        if self.path.is_empty() {
            return None;
        }
        let start = self.start_index.min(self.path.len() - 1);
        let row = (k / 2) as f32;
        let column = k % 2;
        let stagger = if column == 1 { GRID_ROW_SPACING * 0.5 } else { 0.0 };
        let back = GRID_FIRST_OFFSET + row * GRID_ROW_SPACING + stagger;

        let (center, angle) = self.point_behind(start, back);
        let half_width = self.path[self.nearest_path_index(center)].width * 0.5;
        let side = if column == 0 { 1.0 } else { -1.0 };
        let left = math::from_angle(angle + std::f32::consts::FRAC_PI_2);
        let lateral = side * half_width * GRID_LATERAL_FRACTION;

        Some(GridSlot { position: (center.0 + left.0 * lateral, center.1 + left.1 * lateral), rotation: angle })
    }

    /// The first `count` grid slots.
    pub fn grid_slots(&self, count: usize) -> Vec<GridSlot> {
        (0..count).filter_map(|k| self.grid_slot(k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::math;
    use crate::models::{ControlPoint, TrackDescription};
    use crate::track::build;

    fn oval() -> TrackDescription {
        TrackDescription::new(
            "oval",
            "Oval",
            60.0,
            vec![
                ControlPoint::new(0.0, 0.0),
                ControlPoint::new(600.0, 0.0),
                ControlPoint::new(800.0, 200.0),
                ControlPoint::new(600.0, 400.0),
                ControlPoint::new(0.0, 400.0),
                ControlPoint::new(-200.0, 200.0),
            ],
        )
    }

    #[test]
    fn test_slots_are_behind_start_and_on_track() {
        let track = build(&oval()).unwrap();
        let slots = track.grid_slots(6);
        assert_eq!(slots.len(), 6);

        for slot in &slots {
            let idx = track.nearest_path_index(slot.position);
            let center = track.path[idx];
            assert!(math::distance(slot.position, center.position) < center.width * 0.5);
        }
        // Pole sits ahead of the back row (start line heads +x at the origin).
        assert!(slots[0].position.0 > slots[4].position.0);
        assert!(slots[0].rotation.abs() < 0.5);
    }

    #[test]
    fn test_slots_do_not_overlap() {
        let track = build(&oval()).unwrap();
        let slots = track.grid_slots(8);
        for i in 0..slots.len() {
            for j in (i + 1)..slots.len() {
                assert!(math::distance(slots[i].position, slots[j].position) > 20.0);
            }
        }
    }

    #[test]
    fn test_single_slot_matches_grid() {
        let track = build(&oval()).unwrap();
        let slots = track.grid_slots(5);
        assert_eq!(track.grid_slot(4), Some(slots[4]));
    }
}
