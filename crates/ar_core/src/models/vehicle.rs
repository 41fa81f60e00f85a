//! Vehicle state, tuning and control input

use serde::{Deserialize, Serialize};

use crate::engine::math;

/// Mutable per-car state. Only the integrator, contact resolution and
/// explicit teleports write to it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleState {
    pub position: (f32, f32),
    /// Heading in radians, 0 = +x
    pub rotation: f32,
    pub velocity: (f32, f32),
    /// Scalar speed along the heading, always within `[0, max_speed]`
    pub speed: f32,
    pub drifting: bool,
}

impl VehicleState {
    /// A car at rest.
    pub fn new(x: f32, y: f32, rotation: f32) -> Self {
        Self { position: (x, y), rotation, velocity: (0.0, 0.0), speed: 0.0, drifting: false }
    }

    pub fn forward(&self) -> (f32, f32) {
        math::from_angle(self.rotation)
    }

    pub fn speed_ratio(&self, config: &VehicleConfig) -> f32 {
        if config.max_speed <= 0.0 {
            0.0
        } else {
            (self.speed / config.max_speed).clamp(0.0, 1.0)
        }
    }
}

/// Partial update for teleports and resets. `None` fields are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleStatePatch {
    pub position: Option<(f32, f32)>,
    pub rotation: Option<f32>,
    pub velocity: Option<(f32, f32)>,
    pub speed: Option<f32>,
    pub drifting: Option<bool>,
}

impl VehicleStatePatch {
    /// Teleport to a pose and stop the car.
    pub fn teleport(x: f32, y: f32, rotation: f32) -> Self {
        Self {
            position: Some((x, y)),
            rotation: Some(rotation),
            velocity: Some((0.0, 0.0)),
            speed: Some(0.0),
            drifting: Some(false),
        }
    }

    /// Applies the patch; a patched speed is clamped to the car's range.
    pub fn apply(&self, state: &mut VehicleState, config: &VehicleConfig) {
        if let Some(position) = self.position {
            state.position = position;
        }
        if let Some(rotation) = self.rotation {
            state.rotation = rotation;
        }
        if let Some(velocity) = self.velocity {
            state.velocity = velocity;
        }
        if let Some(speed) = self.speed {
            state.speed = if speed.is_finite() { speed.clamp(0.0, config.max_speed) } else { 0.0 };
        }
        if let Some(drifting) = self.drifting {
            state.drifting = drifting;
        }
    }
}

/// Immutable per-class tuning. Copied into every car of the class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub max_speed: f32,
    pub acceleration: f32,
    pub braking: f32,
    /// Linear speed loss per second while coasting
    pub drag: f32,
    /// Turn rate at standstill, rad/s
    pub turn_speed: f32,
    /// Fraction of turn rate lost at max speed
    pub turn_speed_falloff: f32,
    /// No steering below this speed
    pub min_turn_speed: f32,
    /// 0..1, how quickly velocity snaps to the heading
    pub grip: f32,
    /// Speed ratio above which steering starts a drift
    pub drift_threshold: f32,
    /// 0..1, slide persistence while drifting
    pub drift_factor: f32,
    pub length: f32,
    pub width: f32,
}

impl VehicleConfig {
    /// Tuning for the human car.
    pub fn player() -> Self {
        Self {
            max_speed: 300.0,
            acceleration: 150.0,
            braking: 300.0,
            drag: 60.0,
            turn_speed: 3.2,
            turn_speed_falloff: 0.45,
            min_turn_speed: 8.0,
            grip: 0.8,
            drift_threshold: 0.75,
            drift_factor: 0.92,
            length: 28.0,
            width: 12.0,
        }
    }

    /// AI cars: slightly lower top speed, a touch more grip.
    pub fn ai() -> Self {
        Self { max_speed: 290.0, acceleration: 145.0, grip: 0.82, ..Self::player() }
    }

    /// Radius of the circle used for car-to-car contact.
    pub fn collision_radius(&self) -> f32 {
        (self.length + self.width) / 4.0
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self::player()
    }
}

/// Four independent pedal/steer flags, as produced by a human or an AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlInput {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
}

impl ControlInput {
    pub const NONE: ControlInput =
        ControlInput { accelerate: false, brake: false, steer_left: false, steer_right: false };

    /// -1 for left, +1 for right, 0 when neither or both are held.
    pub fn steer_direction(&self) -> f32 {
        match (self.steer_left, self.steer_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn is_steering(&self) -> bool {
        self.steer_direction() != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_collision_radius() {
        assert!((VehicleConfig::player().collision_radius() - 10.0).abs() < 1e-6);
        assert!((VehicleConfig::ai().collision_radius() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_steer_direction() {
        let mut input = ControlInput::NONE;
        assert_eq!(input.steer_direction(), 0.0);
        input.steer_left = true;
        assert_eq!(input.steer_direction(), -1.0);
        input.steer_right = true;
        assert_eq!(input.steer_direction(), 0.0);
        input.steer_left = false;
        assert_eq!(input.steer_direction(), 1.0);
    }

    #[test]
    fn test_patch_clamps_speed() {
        let config = VehicleConfig::player();
        let mut state = VehicleState::new(0.0, 0.0, 0.0);
        VehicleStatePatch { speed: Some(10_000.0), ..Default::default() }.apply(&mut state, &config);
        assert_eq!(state.speed, config.max_speed);

        VehicleStatePatch { speed: Some(-3.0), ..Default::default() }.apply(&mut state, &config);
        assert_eq!(state.speed, 0.0);
    }

    #[test]
    fn test_teleport_stops_car() {
        let config = VehicleConfig::player();
        let mut state = VehicleState { speed: 200.0, velocity: (200.0, 0.0), ..VehicleState::new(1.0, 2.0, 0.0) };
        VehicleStatePatch::teleport(50.0, 60.0, 1.0).apply(&mut state, &config);
        assert_eq!(state.position, (50.0, 60.0));
        assert_eq!(state.rotation, 1.0);
        assert_eq!(state.speed, 0.0);
        assert_eq!(state.velocity, (0.0, 0.0));
    }
}
