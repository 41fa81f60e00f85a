//! Distance-based track containment.
//!
//! A car is on track while it is within half the local width of its nearest
//! centerline sample. Polygon tests against the boundaries break on
//! self-intersecting layouts (tight chicanes, figure-eights); this check does not.

use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;
use crate::engine::math::{self, EPSILON};
use crate::models::VehicleState;

/// Centerline sample with the half-width valid at that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundarySample {
    pub position: (f32, f32),
    pub half_width: f32,
}

/// Result of one containment check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Containment {
    pub state: VehicleState,
    /// True when the car was outside and got pushed back
    pub corrected: bool,
    pub nearest_index: Option<usize>,
}

/// Index of the sample closest to `position`. Linear scan.
pub fn nearest_sample(samples: &[BoundarySample], position: (f32, f32)) -> Option<usize> {
    samples
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            math::distance_sq(a.position, position).total_cmp(&math::distance_sq(b.position, position))
        })
        .map(|(i, _)| i)
}

/// Pulls a car that left the track back to `half_width - containment_buffer`
/// from the nearest sample and scales speed and velocity by
/// `wall_speed_penalty`. A car already on track is returned unchanged.
pub fn constrain_to_track_by_distance(
    state: &VehicleState,
    samples: &[BoundarySample],
    physics: &PhysicsConfig,
) -> Containment {
    let Some(index) = nearest_sample(samples, state.position) else {
        return Containment { state: *state, corrected: false, nearest_index: None };
    };

    let sample = samples[index];
    let offset = (state.position.0 - sample.position.0, state.position.1 - sample.position.1);
    let dist = math::length(offset);
    if dist <= sample.half_width || dist < EPSILON {
        return Containment { state: *state, corrected: false, nearest_index: Some(index) };
    }

    let dir = (offset.0 / dist, offset.1 / dist);
    let reach = (sample.half_width - physics.containment_buffer).max(0.0);
    let penalty = physics.wall_speed_penalty;

    let mut next = *state;
    next.position = (sample.position.0 + dir.0 * reach, sample.position.1 + dir.1 * reach);
    next.speed *= penalty;
    next.velocity = (state.velocity.0 * penalty, state.velocity.1 * penalty);

    Containment { state: next, corrected: true, nearest_index: Some(index) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Straight road along y = 100, width 40.
    fn straight_road() -> Vec<BoundarySample> {
        (0..=100)
            .map(|i| BoundarySample { position: (i as f32 * 10.0, 100.0), half_width: 20.0 })
            .collect()
    }

    #[test]
    fn test_car_off_track_is_pulled_back() {
        let samples = straight_road();
        let physics = PhysicsConfig::default();
        let state = VehicleState {
            speed: 120.0,
            velocity: (100.0, 40.0),
            ..VehicleState::new(500.0, 200.0, 0.0)
        };

        let result = constrain_to_track_by_distance(&state, &samples, &physics);
        assert!(result.corrected);
        let y = result.state.position.1;
        assert!((y - 100.0).abs() < (200.0f32 - 100.0).abs());
        assert!((y - 100.0).abs() <= 20.0 + physics.containment_buffer);
        assert!((result.state.speed - 60.0).abs() < 1e-4);
        assert_eq!(result.state.velocity, (50.0, 20.0));
        assert_eq!(result.state.position.0, 500.0);
    }

    #[test]
    fn test_car_on_track_is_untouched() {
        let samples = straight_road();
        let state = VehicleState { speed: 80.0, ..VehicleState::new(333.0, 115.0, 0.3) };
        let result = constrain_to_track_by_distance(&state, &samples, &PhysicsConfig::default());
        assert!(!result.corrected);
        assert_eq!(result.state, state);
    }

    #[test]
    fn test_no_samples_is_a_no_op() {
        let state = VehicleState::new(1.0, 2.0, 0.0);
        let result = constrain_to_track_by_distance(&state, &[], &PhysicsConfig::default());
        assert_eq!(result.state, state);
        assert_eq!(result.nearest_index, None);
    }

    #[test]
    fn test_corrected_state_is_stable() {
        let samples = straight_road();
        let physics = PhysicsConfig::default();
        let state = VehicleState { speed: 100.0, ..VehicleState::new(250.0, -80.0, 0.0) };
        let once = constrain_to_track_by_distance(&state, &samples, &physics);
        let twice = constrain_to_track_by_distance(&once.state, &samples, &physics);
        assert!(once.corrected);
        assert!(!twice.corrected);
        assert_eq!(twice.state, once.state);
    }

    proptest! {
        #[test]
        fn prop_inside_state_is_unchanged(
            x in 0.0f32..1000.0,
            dy in -20.0f32..20.0,
            speed in 0.0f32..300.0,
            rotation in -3.0f32..3.0,
        ) {
            let samples = straight_road();
            let state = VehicleState { speed, ..VehicleState::new(x, 100.0 + dy, rotation) };
            let nearest = nearest_sample(&samples, state.position).unwrap();
            prop_assume!(math::distance(samples[nearest].position, state.position) <= samples[nearest].half_width);

            let result = constrain_to_track_by_distance(&state, &samples, &PhysicsConfig::default());
            prop_assert!(!result.corrected);
            prop_assert_eq!(result.state, state);
        }
    }
}
