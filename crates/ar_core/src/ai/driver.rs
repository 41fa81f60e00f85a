//! Computer driver.
//!
//! Produces the same [`ControlInput`] a human would. Each call:
//! 1. overtake bookkeeping (commit countdown or scan for a car ahead)
//! 2. steering toward a lookahead point on the selected racing line
//! 3. speed control from the tightest speed factor in the braking window
//! 4. mistake distortion (or a roll for a new mistake)
//!
//! All randomness comes from the injected RNG, so a seeded driver replays
//! exactly.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::AiConfig;
use crate::engine::math;
use crate::models::{ControlInput, VehicleConfig, VehicleState};
use crate::track::racing_line::{self, STRAIGHT_CURVATURE};
use crate::track::{ComputedTrack, RacingLine, RacingLineVariant};

use super::difficulty::Difficulty;
use super::mistake::{self, Mistake, MistakeContext};
use super::overtake;

#[derive(Debug, Clone)]
pub struct AiDriver<R: Rng = ChaCha8Rng> {
    config: AiConfig,
    vehicle: VehicleConfig,
    skill: f32,
    aggressiveness: f32,
    track: Option<Arc<ComputedTrack>>,
    variant: RacingLineVariant,
    commit_ticks: u32,
    mistake: Mistake,
    rng: R,
}

impl AiDriver<ChaCha8Rng> {
    /// Driver with default tuning and a seeded ChaCha RNG.
    pub fn with_seed(skill: f32, aggressiveness: f32, seed: u64) -> Self {
        Self::new(skill, aggressiveness, VehicleConfig::ai(), AiConfig::default(), ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_seed(difficulty.skill(), difficulty.aggressiveness(), seed)
    }
}

impl<R: Rng> AiDriver<R> {
    pub fn new(skill: f32, aggressiveness: f32, vehicle: VehicleConfig, config: AiConfig, rng: R) -> Self {
        Self {
            config,
            vehicle,
            skill: skill.clamp(0.0, 1.0),
            aggressiveness: aggressiveness.clamp(0.0, 1.0),
            track: None,
            variant: RacingLineVariant::Optimal,
            commit_ticks: 0,
            mistake: Mistake::None,
            rng,
        }
    }

    pub fn set_track(&mut self, track: Arc<ComputedTrack>) {
        self.track = Some(track);
        self.variant = RacingLineVariant::Optimal;
        self.commit_ticks = 0;
    }

    pub fn clear_track(&mut self) {
        self.track = None;
    }

    pub fn set_skill(&mut self, skill: f32) {
        self.skill = skill.clamp(0.0, 1.0);
    }

    pub fn set_aggressiveness(&mut self, aggressiveness: f32) {
        self.aggressiveness = aggressiveness.clamp(0.0, 1.0);
    }

    pub fn set_config(&mut self, config: AiConfig) {
        self.config = config;
    }

    pub fn set_vehicle_config(&mut self, vehicle: VehicleConfig) {
        self.vehicle = vehicle;
    }

    pub fn skill(&self) -> f32 {
        self.skill
    }

    pub fn aggressiveness(&self) -> f32 {
        self.aggressiveness
    }

    pub fn variant(&self) -> RacingLineVariant {
        self.variant
    }

    pub fn commit_ticks(&self) -> u32 {
        self.commit_ticks
    }

    pub fn mistake(&self) -> Mistake {
        self.mistake
    }

    pub fn has_track(&self) -> bool {
        self.track.is_some()
    }

    /// Computes this tick's input. `traffic` is every other car; it may be
    /// empty. Without a track every call returns [`ControlInput::NONE`].
    pub fn generate_input(&mut self, state: &VehicleState, traffic: &[VehicleState]) -> ControlInput {
        let Some(track) = self.track.clone() else {
            return ControlInput::NONE;
        };

        self.update_overtake(state, traffic, &track);

        let Some(line) = track.racing_line(self.variant).or_else(|| track.racing_line(RacingLineVariant::Optimal))
        else {
            return ControlInput::NONE;
        };
        let Some(nearest) = line.nearest_index(state.position) else {
            return ControlInput::NONE;
        };

        let speed_ratio = state.speed_ratio(&self.vehicle);
        let mut input = ControlInput::NONE;

        // Steering
        let lookahead = self.config.lookahead_base + state.speed * self.config.lookahead_speed_factor;
        let target = line.points[line.index_ahead(nearest, lookahead)].position;
        let desired = (target.1 - state.position.1).atan2(target.0 - state.position.0);
        let heading_error = math::normalize_angle(desired - state.rotation);
        self.steer(&mut input, heading_error);

        // Speed
        let window = self.config.brake_lookahead_base + state.speed * self.config.brake_lookahead_speed_factor;
        let min_factor = line.min_speed_factor_ahead(nearest, window);
        self.control_speed(&mut input, speed_ratio, min_factor, heading_error);

        // Mistakes
        if self.mistake.is_active() {
            input = self.mistake.apply(input, &mut self.rng);
            self.mistake = self.mistake.tick();
        } else {
            let ctx = MistakeContext {
                in_corner: min_factor < self.config.corner_speed_factor,
                speed_ratio,
                corner_tightness: 1.0 - min_factor,
            };
            self.mistake = mistake::roll_mistake(&ctx, self.skill, self.aggressiveness, &self.config, &mut self.rng);
            if self.mistake.is_active() {
                log::trace!("AI mistake: {}", self.mistake.as_str());
            }
        }

        input
    }

    fn steer(&mut self, input: &mut ControlInput, heading_error: f32) {
        let threshold = self.config.steer_threshold_min + (1.0 - self.skill) * self.config.steer_threshold_skill_range;
        if heading_error.abs() <= threshold {
            return;
        }
        // Positive heading change is +1 steering.
        let mut right = heading_error > 0.0;

        if self.rng.gen::<f32>() < self.config.under_correct_chance * (1.0 - self.skill) {
            return;
        }
        if self.skill < self.config.invert_skill_ceiling {
            let clumsiness = 1.0 - self.skill / self.config.invert_skill_ceiling;
            if self.rng.gen::<f32>() < self.config.invert_chance * clumsiness {
                right = !right;
            }
        }
        input.steer_right = right;
        input.steer_left = !right;
    }

    fn control_speed(&mut self, input: &mut ControlInput, speed_ratio: f32, min_factor: f32, heading_error: f32) {
        let target_ratio = min_factor * (0.5 + 0.5 * self.aggressiveness);

        if speed_ratio > target_ratio + self.config.speed_margin {
            input.brake = true;
            if self.rng.gen::<f32>() < self.config.panic_brake_chance * (1.0 - self.skill) {
                input.accelerate = true;
            }
            return;
        }

        let base = self.config.base_throttle_chance;
        let throttle_chance = base + (1.0 - base) * self.aggressiveness;
        input.accelerate = self.rng.gen::<f32>() < throttle_chance;

        if heading_error.abs() > self.config.hard_steer_error && speed_ratio > self.config.hard_steer_speed_ratio {
            input.accelerate = false;
        }
    }

    fn update_overtake(&mut self, state: &VehicleState, traffic: &[VehicleState], track: &ComputedTrack) {
        if self.commit_ticks > 0 {
            self.commit_ticks -= 1;
            return;
        }

        match overtake::find_car_ahead(state, traffic, &self.config) {
            Some(ahead) if overtake::is_faster(state, &traffic[ahead.index], &self.config) => {
                let turn = next_turn_direction(track, state.position, &self.config, state.speed);
                self.variant = overtake::choose_variant(self.aggressiveness, turn, ahead.lateral);
                self.commit_ticks = overtake::commit_ticks(self.aggressiveness, &self.config);
                log::trace!(
                    "AI commits to {} line for {} ticks (car ahead at {:.0})",
                    self.variant.as_str(),
                    self.commit_ticks,
                    ahead.distance
                );
            }
            Some(_) => {}
            None => self.variant = RacingLineVariant::Optimal,
        }
    }
}

/// Sign of the tightest corner within the braking window, 0 when the
/// window is straight.
fn next_turn_direction(track: &ComputedTrack, position: (f32, f32), config: &AiConfig, speed: f32) -> f32 {
    let Some(line) = track.racing_line(RacingLineVariant::Optimal) else {
        return 0.0;
    };
    let Some(start) = line.nearest_index(position) else {
        return 0.0;
    };
    let window = config.brake_lookahead_base + speed * config.brake_lookahead_speed_factor;
    let apex = tightest_index(line, start, window);
    let curvature = racing_line::signed_curvature(&track.path, apex);
    if curvature.abs() < STRAIGHT_CURVATURE {
        0.0
    } else {
        curvature.signum()
    }
}

fn tightest_index(line: &RacingLine, start: usize, distance: f32) -> usize {
    let n = line.len();
    let end = line.index_ahead(start, distance);
    let mut idx = start % n;
    let mut best = idx;
    while idx != end {
        idx = (idx + 1) % n;
        if line.points[idx].speed_factor < line.points[best].speed_factor {
            best = idx;
        }
    }
    best
}
