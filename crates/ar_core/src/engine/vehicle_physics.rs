//! Arcade vehicle integrator.
//!
//! One pure function advances a car by one fixed step. The stage order is
//! part of the contract:
//! 1. longitudinal (throttle/brake, clamp to `[0, max_speed]`)
//! 2. steering (ignored below `min_turn_speed`) and drift flag
//! 3. cornering grip limit
//! 4. drag (coasting only)
//! 5. velocity blend toward the heading (drift vs grip)
//! 6. position

use crate::engine::math;
use crate::models::{ControlInput, VehicleConfig, VehicleState};

/// Speed ratio below which cornering never exceeds available grip.
pub const GRIP_LIMIT_MIN_SPEED_RATIO: f32 = 0.3;

/// Speed scrubbed per second per unit of grip deficit, as a fraction of speed.
pub const GRIP_SCRUB_RATE: f32 = 4.0;

pub fn step(state: &VehicleState, input: &ControlInput, config: &VehicleConfig, dt: f32) -> VehicleState {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    // 1. Longitudinal
    let mut speed = state.speed;
    if input.accelerate {
        speed += config.acceleration * dt;
    }
    if input.brake {
        speed -= config.braking * dt;
    }
    speed = speed.clamp(0.0, config.max_speed);

    // 2. Steering
    let speed_ratio = if config.max_speed > 0.0 { speed / config.max_speed } else { 0.0 };
    let direction = input.steer_direction();
    let steering = direction != 0.0 && speed >= config.min_turn_speed;

    let mut rotation = state.rotation;
    if steering {
        let turn_rate = config.turn_speed * (1.0 - speed_ratio * config.turn_speed_falloff);
        rotation += turn_rate * dt * direction;
    }
    let drifting = steering && speed_ratio > config.drift_threshold;

    // 3. Cornering grip limit
    if steering && speed_ratio > GRIP_LIMIT_MIN_SPEED_RATIO {
        let deficit = speed_ratio * speed_ratio - config.grip;
        if deficit > 0.0 {
            speed = (speed - speed * deficit * GRIP_SCRUB_RATE * dt).max(0.0);
        }
    }

    // 4. Drag
    if !input.accelerate {
        speed = (speed - config.drag * dt).max(0.0);
    }

    // 5. Velocity blend
    let heading = math::from_angle(rotation);
    let target = (heading.0 * speed, heading.1 * speed);
    let blend = if drifting { 1.0 - config.drift_factor } else { config.grip };
    let velocity = (
        state.velocity.0 * (1.0 - blend) + target.0 * blend,
        state.velocity.1 * (1.0 - blend) + target.1 * blend,
    );

    // 6. Position
    let position = (state.position.0 + velocity.0 * dt, state.position.1 + velocity.1 * dt);

    VehicleState { position, rotation, velocity, speed, drifting }
}
