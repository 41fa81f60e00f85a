//! Driver mistakes.
//!
//! At most one mistake is active. A new one is only rolled while the driver
//! is clean; while active it distorts the nominal input and counts down one
//! tick per call.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::models::ControlInput;

pub mod constants {
    /// Minimum speed ratio for understeer
    pub const UNDERSTEER_MIN_SPEED: f32 = 0.4;
    /// Minimum speed ratio for oversteer
    pub const OVERSTEER_MIN_SPEED: f32 = 0.6;
    /// Minimum speed ratio for a lockup
    pub const LOCKUP_MIN_SPEED: f32 = 0.7;
    /// Corner tightness (1 - speed factor) needed for a lockup
    pub const LOCKUP_MIN_TIGHTNESS: f32 = 0.4;
    /// Speed ratio window for wheelspin
    pub const WHEELSPIN_SPEED_RANGE: (f32, f32) = (0.15, 0.5);

    /// Duration ranges in ticks (60 Hz)
    pub const UNDERSTEER_TICKS: (u32, u32) = (30, 60);
    pub const OVERSTEER_TICKS: (u32, u32) = (20, 45);
    pub const LOCKUP_TICKS: (u32, u32) = (15, 30);
    pub const WHEELSPIN_TICKS: (u32, u32) = (20, 40);

    /// Share of the base chance kept by a perfect driver
    pub const SKILL_FLOOR: f32 = 0.25;
    /// Severity never drops below this
    pub const MIN_SEVERITY: f32 = 0.05;
}

pub use constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MistakeState {
    /// 0..1, how strongly the nominal input is distorted
    pub severity: f32,
    pub ticks_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Mistake {
    #[default]
    None,
    /// Steering response drops out
    Understeer(MistakeState),
    /// Rear steps out: throttle lifts and steering wobbles
    Oversteer(MistakeState),
    /// Wheels lock: brake forced, steering mostly gone
    Lockup(MistakeState),
    /// Too much throttle out of a slow corner, with wobble
    Wheelspin(MistakeState),
}

/// Situation used to gate the mistake rolls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MistakeContext {
    pub in_corner: bool,
    pub speed_ratio: f32,
    /// `1 - min upcoming speed factor`
    pub corner_tightness: f32,
}

impl Mistake {
    pub fn is_active(&self) -> bool {
        !matches!(self, Mistake::None)
    }

    pub fn state(&self) -> Option<MistakeState> {
        match *self {
            Mistake::None => None,
            Mistake::Understeer(s) | Mistake::Oversteer(s) | Mistake::Lockup(s) | Mistake::Wheelspin(s) => Some(s),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mistake::None => "none",
            Mistake::Understeer(_) => "understeer",
            Mistake::Oversteer(_) => "oversteer",
            Mistake::Lockup(_) => "lockup",
            Mistake::Wheelspin(_) => "wheelspin",
        }
    }

    /// One tick elapsed. Clears when the countdown reaches zero.
    pub fn tick(self) -> Mistake {
        let countdown = |s: MistakeState| {
            let ticks_left = s.ticks_left.saturating_sub(1);
            (ticks_left > 0).then_some(MistakeState { ticks_left, ..s })
        };
        match self {
            Mistake::None => Mistake::None,
            Mistake::Understeer(s) => countdown(s).map_or(Mistake::None, Mistake::Understeer),
            Mistake::Oversteer(s) => countdown(s).map_or(Mistake::None, Mistake::Oversteer),
            Mistake::Lockup(s) => countdown(s).map_or(Mistake::None, Mistake::Lockup),
            Mistake::Wheelspin(s) => countdown(s).map_or(Mistake::None, Mistake::Wheelspin),
        }
    }

    /// Distorts the nominal input according to the active mistake.
    pub fn apply(&self, nominal: ControlInput, rng: &mut impl Rng) -> ControlInput {
        let mut input = nominal;
        match *self {
            Mistake::None => {}
            Mistake::Understeer(s) => {
                if input.is_steering() && rng.gen::<f32>() < s.severity {
                    input.steer_left = false;
                    input.steer_right = false;
                }
            }
            Mistake::Oversteer(s) => {
                input.accelerate = false;
                if rng.gen::<f32>() < s.severity * 0.5 {
                    wobble(&mut input, rng);
                }
            }
            Mistake::Lockup(s) => {
                input.brake = true;
                input.accelerate = false;
                if rng.gen::<f32>() < 0.5 + 0.5 * s.severity {
                    input.steer_left = false;
                    input.steer_right = false;
                }
            }
            Mistake::Wheelspin(s) => {
                input.accelerate = true;
                input.brake = false;
                if rng.gen::<f32>() < s.severity * 0.5 {
                    wobble(&mut input, rng);
                }
            }
        }
        input
    }
}

fn wobble(input: &mut ControlInput, rng: &mut impl Rng) {
    let left = rng.gen_bool(0.5);
    input.steer_left = left;
    input.steer_right = !left;
}

/// Gated roll; the RNG is only drawn from when the gate is open.
fn roll(gate: bool, chance: f32, rng: &mut impl Rng) -> bool {
    gate && rng.gen::<f32>() < chance
}

fn new_state(range: (u32, u32), skill: f32, aggressiveness: f32, rng: &mut impl Rng) -> MistakeState {
    let ticks_left = rng.gen_range(range.0..=range.1);
    let scale = (1.0 - skill * 0.5) * (0.7 + 0.3 * aggressiveness);
    let severity = ((0.3 + 0.7 * rng.gen::<f32>()) * scale).clamp(MIN_SEVERITY, 1.0);
    MistakeState { severity, ticks_left }
}

/// Rolls each mistake type in order (understeer, oversteer, lockup,
/// wheelspin) against its gate; the first success wins.
pub fn roll_mistake(
    ctx: &MistakeContext,
    skill: f32,
    aggressiveness: f32,
    config: &AiConfig,
    rng: &mut impl Rng,
) -> Mistake {
    let base = config.mistake_base_chance * (1.0 - skill * (1.0 - SKILL_FLOOR));
    if base <= 0.0 {
        return Mistake::None;
    }
    let aggression = 0.5 + aggressiveness;

    if roll(ctx.in_corner && ctx.speed_ratio > UNDERSTEER_MIN_SPEED, base * (1.0 + ctx.corner_tightness), rng) {
        return Mistake::Understeer(new_state(UNDERSTEER_TICKS, skill, aggressiveness, rng));
    }
    if roll(ctx.in_corner && ctx.speed_ratio > OVERSTEER_MIN_SPEED, base * aggression, rng) {
        return Mistake::Oversteer(new_state(OVERSTEER_TICKS, skill, aggressiveness, rng));
    }
    if roll(
        ctx.speed_ratio > LOCKUP_MIN_SPEED && ctx.corner_tightness > LOCKUP_MIN_TIGHTNESS,
        base * aggression,
        rng,
    ) {
        return Mistake::Lockup(new_state(LOCKUP_TICKS, skill, aggressiveness, rng));
    }
    let (low, high) = WHEELSPIN_SPEED_RANGE;
    if roll(ctx.in_corner && ctx.speed_ratio > low && ctx.speed_ratio < high, base * aggression, rng) {
        return Mistake::Wheelspin(new_state(WHEELSPIN_TICKS, skill, aggressiveness, rng));
    }
    Mistake::None
}
