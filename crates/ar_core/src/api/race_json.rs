//! String-in / string-out entry points for embedding hosts.

use std::collections::BTreeSet;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ai::Difficulty;
use crate::config::EngineConfig;
use crate::engine::RaceSession;
use crate::error::{Result, TrackError};
use crate::models::TrackDescription;
use crate::track;

pub const SCHEMA_VERSION: u8 = 1;

/// Longest race a single request may ask for.
pub const MAX_DURATION_S: f32 = 3600.0;

/// Smallest integration step a request may configure (1 kHz).
pub const MIN_FIXED_DT: f32 = 1.0 / 1000.0;

fn default_schema_version() -> u8 {
    SCHEMA_VERSION
}

fn default_duration() -> f32 {
    30.0
}

/// One AI entrant. Explicit `skill` / `aggressiveness` override the
/// difficulty preset (Medium when omitted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DriverRequest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggressiveness: Option<f32>,
}

impl DriverRequest {
    pub fn resolved(&self) -> (f32, f32) {
        let preset = self.difficulty.unwrap_or_default();
        (self.skill.unwrap_or(preset.skill()), self.aggressiveness.unwrap_or(preset.aggressiveness()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaceRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    pub track: TrackDescription,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_duration")]
    pub duration_s: f32,
    #[serde(default)]
    pub drivers: Vec<DriverRequest>,
    /// Engine tuning; defaults when omitted
    #[serde(default)]
    pub config: Option<EngineConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleResult {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub speed: f32,
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResponse {
    pub schema_version: u8,
    pub track_id: String,
    pub ticks: u64,
    pub collisions: u64,
    pub containments: u64,
    pub vehicles: Vec<VehicleResult>,
}

/// TrackDescription JSON in, ComputedTrack JSON out.
pub fn build_track_json(json: &str) -> Result<String> {
    let desc = TrackDescription::from_json_str(json)?;
    let computed = track::build(&desc)?;
    Ok(serde_json::to_string(&computed)?)
}

/// Runs a headless AI-only race.
pub fn simulate_race(request: &RaceRequest) -> Result<RaceResponse> {
    if !(request.duration_s > 0.0 && request.duration_s <= MAX_DURATION_S) {
        return Err(TrackError::InvalidDuration { seconds: request.duration_s, max: MAX_DURATION_S });
    }
    let mut seen = BTreeSet::new();
    for driver in &request.drivers {
        if !seen.insert(driver.id.as_str()) {
            return Err(TrackError::DuplicateDriver { id: driver.id.clone() });
        }
    }

    let config = request.config.clone().unwrap_or_default();
    let timestep = &config.timestep;
    if !(timestep.fixed_dt >= MIN_FIXED_DT && timestep.fixed_dt <= timestep.max_step_dt) {
        return Err(TrackError::InvalidTimestep {
            fixed_dt: timestep.fixed_dt,
            min: MIN_FIXED_DT,
            max: timestep.max_step_dt,
        });
    }
    let computed = Arc::new(track::build_with_config(&request.track, &config.geometry)?);
    let mut session = RaceSession::with_seed(computed, config, request.seed);
    for driver in &request.drivers {
        let (skill, aggressiveness) = driver.resolved();
        session.add_ai(&driver.id, skill, aggressiveness);
    }

    session.run_for(request.duration_s);
    let summary = session.summary();

    Ok(RaceResponse {
        schema_version: SCHEMA_VERSION,
        track_id: summary.track_id,
        ticks: summary.ticks,
        collisions: summary.collisions,
        containments: summary.containments,
        vehicles: summary
            .vehicles
            .into_iter()
            .map(|v| VehicleResult {
                id: v.id,
                x: v.state.position.0,
                y: v.state.position.1,
                rotation: v.state.rotation,
                speed: v.state.speed,
                progress: v.progress,
            })
            .collect(),
    })
}

pub fn simulate_race_json(json: &str) -> Result<String> {
    let request: RaceRequest = serde_json::from_str(json)?;
    let response = simulate_race(&request)?;
    Ok(serde_json::to_string(&response)?)
}
