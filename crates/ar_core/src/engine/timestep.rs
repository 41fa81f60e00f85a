//! Fixed-step timing.
//!
//! Physics always integrates at `fixed_dt`; variable frame deltas feed an
//! accumulator that releases whole steps. Frame deltas are capped and so is
//! the number of steps per frame, so a stalled frame cannot snowball.

use crate::config::TimestepConfig;

/// Default integration step (60 Hz)
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Default per-frame step cap
pub const MAX_STEPS_PER_FRAME: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    config: TimestepConfig,
    accumulator: f32,
    total_steps: u64,
}

impl FixedTimestep {
    pub fn new(config: TimestepConfig) -> Self {
        Self { config, accumulator: 0.0, total_steps: 0 }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.config.fixed_dt
    }

    /// Adds a frame delta and returns how many fixed steps to run now.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let fixed_dt = self.config.fixed_dt;
        if fixed_dt.is_nan() || fixed_dt <= 0.0 {
            return 0;
        }
        let frame_dt = if frame_dt.is_finite() { frame_dt.clamp(0.0, self.config.max_frame_dt) } else { 0.0 };
        self.accumulator += frame_dt;

        let mut steps = 0;
        while self.accumulator >= fixed_dt && steps < self.config.max_steps_per_frame {
            self.accumulator -= fixed_dt;
            steps += 1;
        }
        if steps == self.config.max_steps_per_frame && self.accumulator >= fixed_dt {
            log::debug!("Dropping {:.4}s of simulation time after {} steps", self.accumulator, steps);
            self.accumulator %= fixed_dt;
        }
        self.total_steps += u64::from(steps);
        steps
    }

    /// Fraction of a step left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f32 {
        if self.config.fixed_dt > 0.0 {
            self.accumulator / self.config.fixed_dt
        } else {
            0.0
        }
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn elapsed(&self) -> f32 {
        self.total_steps as f32 * self.config.fixed_dt
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(TimestepConfig::default())
    }
}
