//! Overtake detection and line choice.

use crate::config::AiConfig;
use crate::engine::math;
use crate::models::VehicleState;
use crate::track::RacingLineVariant;

/// Lateral fraction beyond which the car ahead counts as holding one side.
pub const SIDE_HOLD_THRESHOLD: f32 = 0.1;

/// Aggressiveness from which a driver tries the inside.
pub const INSIDE_AGGRESSION: f32 = 0.5;

/// Nearest car inside the forward cone and distance window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarAhead {
    /// Index into the traffic slice
    pub index: usize,
    pub distance: f32,
    /// Sine of the bearing: positive toward increasing heading angle
    pub lateral: f32,
}

pub fn find_car_ahead(me: &VehicleState, traffic: &[VehicleState], config: &AiConfig) -> Option<CarAhead> {
    let forward = me.forward();
    traffic
        .iter()
        .enumerate()
        .filter_map(|(index, other)| {
            let delta = (other.position.0 - me.position.0, other.position.1 - me.position.1);
            let distance = math::length(delta);
            if distance < config.overtake_min_distance || distance > config.overtake_max_distance {
                return None;
            }
            let dir = (delta.0 / distance, delta.1 / distance);
            if math::dot(forward, dir) < config.overtake_cone_cos {
                return None;
            }
            Some(CarAhead { index, distance, lateral: math::cross(forward, dir) })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Closing on `other` along the line between the cars, or simply faster.
pub fn is_faster(me: &VehicleState, other: &VehicleState, config: &AiConfig) -> bool {
    let dir = math::normalize((other.position.0 - me.position.0, other.position.1 - me.position.1));
    let relative = (me.velocity.0 - other.velocity.0, me.velocity.1 - other.velocity.1);
    let closing = math::dot(relative, dir);
    closing > config.overtake_speed_margin || me.speed > other.speed + config.overtake_speed_margin
}

/// `turn` is the sign of the next corner's curvature (0 on a straight).
/// Aggressive drivers go for the inside unless the car ahead already holds
/// it; everyone else goes around the outside.
pub fn choose_variant(aggressiveness: f32, turn: f32, ahead_lateral: f32) -> RacingLineVariant {
    let holds_inside = turn != 0.0 && ahead_lateral.abs() > SIDE_HOLD_THRESHOLD && ahead_lateral.signum() == turn.signum();
    if aggressiveness >= INSIDE_AGGRESSION && !holds_inside {
        RacingLineVariant::Inside
    } else {
        RacingLineVariant::Outside
    }
}

/// Commit duration in ticks.
pub fn commit_ticks(aggressiveness: f32, config: &AiConfig) -> u32 {
    config.overtake_commit_base_ticks
        + (aggressiveness.clamp(0.0, 1.0) * config.overtake_commit_aggression_ticks as f32).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(x: f32, y: f32, speed: f32) -> VehicleState {
        VehicleState { speed, velocity: (speed, 0.0), ..VehicleState::new(x, y, 0.0) }
    }

    #[test]
    fn test_finds_nearest_in_cone() {
        let cfg = AiConfig::default();
        let me = car(0.0, 0.0, 200.0);
        let traffic = [car(120.0, 0.0, 100.0), car(60.0, 5.0, 100.0), car(-50.0, 0.0, 100.0)];
        let ahead = find_car_ahead(&me, &traffic, &cfg).unwrap();
        assert_eq!(ahead.index, 1);
        assert!(ahead.lateral > 0.0);
    }

    #[test]
    fn test_ignores_cars_outside_window() {
        let cfg = AiConfig::default();
        let me = car(0.0, 0.0, 200.0);
        let traffic = [
            car(5.0, 0.0, 0.0),     // too close
            car(500.0, 0.0, 0.0),   // too far
            car(50.0, 100.0, 0.0),  // beside, outside the cone
            car(-80.0, 0.0, 300.0), // behind
        ];
        assert!(find_car_ahead(&me, &traffic, &cfg).is_none());
    }

    #[test]
    fn test_is_faster() {
        let cfg = AiConfig::default();
        let me = car(0.0, 0.0, 200.0);
        assert!(is_faster(&me, &car(60.0, 0.0, 150.0), &cfg));
        assert!(!is_faster(&me, &car(60.0, 0.0, 198.0), &cfg));
    }

    #[test]
    fn test_variant_choice() {
        // Aggressive with a clear inside: dive.
        assert_eq!(choose_variant(0.8, 1.0, -0.3), RacingLineVariant::Inside);
        // Car ahead already on the inside of a left-hander: go around.
        assert_eq!(choose_variant(0.8, 1.0, 0.3), RacingLineVariant::Outside);
        // Cautious drivers always go around.
        assert_eq!(choose_variant(0.2, -1.0, 0.3), RacingLineVariant::Outside);
        assert_eq!(choose_variant(0.6, 0.0, 0.9), RacingLineVariant::Inside);
    }

    #[test]
    fn test_commit_scales_with_aggression() {
        let cfg = AiConfig::default();
        assert_eq!(commit_ticks(0.0, &cfg), 60);
        assert_eq!(commit_ticks(1.0, &cfg), 180);
        assert!(commit_ticks(0.5, &cfg) > commit_ticks(0.2, &cfg));
    }
}
