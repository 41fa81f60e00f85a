//! Car-to-car contact.
//!
//! Each car is a circle of radius `(length + width) / 4`. Overlapping cars
//! are pushed apart half each along the center line; closing cars exchange
//! an equal-mass restitution impulse.

use crate::config::PhysicsConfig;
use crate::engine::math::{self, EPSILON};
use crate::models::{VehicleConfig, VehicleState};

/// Separation axis used when two centers coincide.
pub const COINCIDENT_NORMAL: (f32, f32) = (1.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub colliding: bool,
    /// Sum of radii minus center distance, 0 when apart
    pub overlap: f32,
    /// Unit vector from `a` toward `b`
    pub normal: (f32, f32),
    pub distance: f32,
}

pub fn check_car_collision(
    a: &VehicleState,
    a_config: &VehicleConfig,
    b: &VehicleState,
    b_config: &VehicleConfig,
) -> CollisionInfo {
    let delta = (b.position.0 - a.position.0, b.position.1 - a.position.1);
    let distance = math::length(delta);
    let radii = a_config.collision_radius() + b_config.collision_radius();

    let normal = if distance < EPSILON { COINCIDENT_NORMAL } else { (delta.0 / distance, delta.1 / distance) };
    let colliding = distance < radii;

    CollisionInfo { colliding, overlap: if colliding { radii - distance } else { 0.0 }, normal, distance }
}

/// Re-derives scalar speed from velocity, rescaling both to `max_speed` if needed.
fn clamp_to_max_speed(state: &mut VehicleState, config: &VehicleConfig) {
    let speed = math::length(state.velocity);
    if speed > config.max_speed && speed > EPSILON {
        let scale = config.max_speed / speed;
        state.velocity = (state.velocity.0 * scale, state.velocity.1 * scale);
        state.speed = config.max_speed;
    } else {
        state.speed = speed;
    }
}

/// Separates and bounces two cars if they overlap. Returns the contact info
/// measured before resolution.
pub fn resolve_car_collision(
    a: &mut VehicleState,
    a_config: &VehicleConfig,
    b: &mut VehicleState,
    b_config: &VehicleConfig,
    physics: &PhysicsConfig,
) -> CollisionInfo {
    let info = check_car_collision(a, a_config, b, b_config);
    if !info.colliding {
        return info;
    }

    let n = info.normal;
    let push = info.overlap * 0.5 + physics.separation_buffer;
    a.position = (a.position.0 - n.0 * push, a.position.1 - n.1 * push);
    b.position = (b.position.0 + n.0 * push, b.position.1 + n.1 * push);

    let relative = (b.velocity.0 - a.velocity.0, b.velocity.1 - a.velocity.1);
    let closing = math::dot(relative, n);
    if closing < 0.0 {
        let j = -(1.0 + physics.restitution) * closing * 0.5;
        a.velocity = (a.velocity.0 - n.0 * j, a.velocity.1 - n.1 * j);
        b.velocity = (b.velocity.0 + n.0 * j, b.velocity.1 + n.1 * j);
    }

    clamp_to_max_speed(a, a_config);
    clamp_to_max_speed(b, b_config);
    info
}

/// Checks every pair once, in index order. Returns the colliding pairs.
pub fn resolve_all(
    states: &mut [VehicleState],
    configs: &[VehicleConfig],
    physics: &PhysicsConfig,
) -> Vec<(usize, usize)> {
    let n = states.len().min(configs.len());
    let mut contacts = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = states.split_at_mut(j);
            let info = resolve_car_collision(&mut head[i], &configs[i], &mut tail[0], &configs[j], physics);
            if info.colliding {
                contacts.push((i, j));
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn moving(x: f32, y: f32, vx: f32, vy: f32) -> VehicleState {
        VehicleState {
            velocity: (vx, vy),
            speed: (vx * vx + vy * vy).sqrt(),
            ..VehicleState::new(x, y, 0.0)
        }
    }

    #[test]
    fn test_coincident_cars_collide() {
        let cfg = VehicleConfig::player();
        let a = VehicleState::new(100.0, 100.0, 0.0);
        let b = VehicleState::new(100.0, 100.0, 0.0);
        let info = check_car_collision(&a, &cfg, &b, &cfg);
        assert!(info.colliding);
        assert!((info.overlap - 20.0).abs() < 1e-6);
        assert!(math::length(info.normal) > 0.5);
    }

    #[test]
    fn test_coincident_cars_are_pushed_apart() {
        let cfg = VehicleConfig::player();
        let physics = PhysicsConfig::default();
        let mut a = VehicleState::new(0.0, 0.0, 0.0);
        let mut b = VehicleState::new(0.0, 0.0, 0.0);
        resolve_car_collision(&mut a, &cfg, &mut b, &cfg, &physics);
        assert!((a.position.0 + 10.5).abs() < 1e-5);
        assert!((b.position.0 - 10.5).abs() < 1e-5);
        assert!(!check_car_collision(&a, &cfg, &b, &cfg).colliding);
    }

    #[test]
    fn test_apart_cars_do_not_collide() {
        let cfg = VehicleConfig::player();
        let a = VehicleState::new(0.0, 0.0, 0.0);
        let b = VehicleState::new(25.0, 0.0, 0.0);
        let info = check_car_collision(&a, &cfg, &b, &cfg);
        assert!(!info.colliding);
        assert_eq!(info.overlap, 0.0);
    }

    #[test]
    fn test_rear_end_impulse_conserves_momentum() {
        let cfg = VehicleConfig::player();
        let physics = PhysicsConfig::default();
        let mut a = moving(0.0, 0.0, 100.0, 0.0);
        let mut b = moving(15.0, 0.0, 0.0, 0.0);
        resolve_car_collision(&mut a, &cfg, &mut b, &cfg, &physics);

        assert!((a.velocity.0 + b.velocity.0 - 100.0).abs() < 1e-3);
        assert!((a.velocity.0 - 35.0).abs() < 1e-3);
        assert!((b.velocity.0 - 65.0).abs() < 1e-3);
        assert!((a.speed - 35.0).abs() < 1e-3);
        assert!((b.speed - 65.0).abs() < 1e-3);
    }

    #[test]
    fn test_separating_cars_keep_velocity() {
        let cfg = VehicleConfig::player();
        let mut a = moving(0.0, 0.0, -50.0, 0.0);
        let mut b = moving(15.0, 0.0, 50.0, 0.0);
        resolve_car_collision(&mut a, &cfg, &mut b, &cfg, &PhysicsConfig::default());
        assert_eq!(a.velocity, (-50.0, 0.0));
        assert_eq!(b.velocity, (50.0, 0.0));
    }

    #[test]
    fn test_outgoing_speed_is_clamped() {
        let slow = VehicleConfig { max_speed: 40.0, ..VehicleConfig::player() };
        let fast = VehicleConfig::player();
        let physics = PhysicsConfig { restitution: 1.0, ..PhysicsConfig::default() };
        let mut a = moving(0.0, 0.0, 300.0, 0.0);
        let mut b = moving(15.0, 0.0, 0.0, 0.0);
        resolve_car_collision(&mut a, &fast, &mut b, &slow, &physics);
        assert_eq!(b.speed, 40.0);
        assert!((math::length(b.velocity) - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_resolve_all_reports_pairs() {
        let cfg = VehicleConfig::player();
        let mut states = vec![
            VehicleState::new(0.0, 0.0, 0.0),
            VehicleState::new(5.0, 0.0, 0.0),
            VehicleState::new(500.0, 0.0, 0.0),
        ];
        let contacts = resolve_all(&mut states, &[cfg; 3], &PhysicsConfig::default());
        assert_eq!(contacts, vec![(0, 1)]);
        assert_eq!(states[2].position, (500.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_resolution_is_symmetric(
            ax in -20.0f32..20.0, ay in -20.0f32..20.0,
            bx in -20.0f32..20.0, by in -20.0f32..20.0,
            avx in -200.0f32..200.0, avy in -200.0f32..200.0,
            bvx in -200.0f32..200.0, bvy in -200.0f32..200.0,
        ) {
            prop_assume!(math::distance((ax, ay), (bx, by)) > 1e-3);
            let cfg = VehicleConfig::player();
            let physics = PhysicsConfig::default();
            let a0 = moving(ax, ay, avx, avy);
            let b0 = moving(bx, by, bvx, bvy);

            let (mut a1, mut b1) = (a0, b0);
            resolve_car_collision(&mut a1, &cfg, &mut b1, &cfg, &physics);
            let (mut b2, mut a2) = (b0, a0);
            resolve_car_collision(&mut b2, &cfg, &mut a2, &cfg, &physics);

            for (x, y) in [(a1, a2), (b1, b2)] {
                prop_assert!(math::distance(x.position, y.position) < 1e-3);
                prop_assert!(math::distance(x.velocity, y.velocity) < 1e-2);
                prop_assert!((x.speed - y.speed).abs() < 1e-2);
            }
        }
    }
}
