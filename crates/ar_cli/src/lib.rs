//! Race Runner Library
//!
//! Track JSON → ComputedTrack JSON
//! Track JSON → headless AI races (single or batched in parallel)

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ar_core::ai::Difficulty;
use ar_core::config::EngineConfig;
use ar_core::engine::{RaceSession, VehicleSummary};
use ar_core::models::TrackDescription;
use ar_core::track::{self, ComputedTrack};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct RaceOptions {
    pub opponents: usize,
    pub seconds: f32,
    pub seed: u64,
    pub difficulty: Difficulty,
    /// Use the forgiving arcade tuning
    pub arcade: bool,
}

impl Default for RaceOptions {
    fn default() -> Self {
        Self { opponents: 5, seconds: 60.0, seed: 0, difficulty: Difficulty::Medium, arcade: false }
    }
}

/// Result of one headless race
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceReport {
    /// RFC3339 timestamp
    pub created_at: String,
    pub track_id: String,
    pub seed: u64,
    pub ticks: u64,
    pub elapsed: f32,
    pub collisions: u64,
    pub containments: u64,
    pub vehicles: Vec<VehicleSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub runs: usize,
    pub mean_collisions: f64,
    pub mean_containments: f64,
    pub max_collisions: u64,
}

pub fn load_track(path: &Path) -> Result<TrackDescription> {
    TrackDescription::from_path(path).with_context(|| format!("Failed to load track: {}", path.display()))
}

/// Builds geometry for a track file, optionally writing it as JSON.
pub fn build_track_file(input: &Path, output: Option<&Path>) -> Result<ComputedTrack> {
    let desc = load_track(input)?;
    let computed = track::build(&desc).with_context(|| format!("Failed to build track '{}'", desc.id))?;
    if let Some(output) = output {
        write_json(output, &computed)?;
    }
    Ok(computed)
}

/// One AI-only race; opponents are named `ai1..=aiN`.
pub fn run_race(track: Arc<ComputedTrack>, options: &RaceOptions) -> RaceReport {
    let config = if options.arcade { EngineConfig::arcade() } else { EngineConfig::default() };
    let mut session = RaceSession::with_seed(track, config, options.seed);
    for k in 1..=options.opponents {
        session.add_ai(&format!("ai{k}"), options.difficulty.skill(), options.difficulty.aggressiveness());
    }
    session.run_for(options.seconds);
    let summary = session.summary();

    RaceReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        track_id: summary.track_id,
        seed: options.seed,
        ticks: summary.ticks,
        elapsed: summary.elapsed,
        collisions: summary.collisions,
        containments: summary.containments,
        vehicles: summary.vehicles,
    }
}

/// `runs` independent races in parallel, seeded `seed, seed + 1, ...`.
/// Results come back in seed order.
pub fn run_batch(track: Arc<ComputedTrack>, options: &RaceOptions, runs: usize) -> Vec<RaceReport> {
    (0..runs)
        .into_par_iter()
        .map(|i| {
            let opts = RaceOptions { seed: options.seed.wrapping_add(i as u64), ..options.clone() };
            run_race(Arc::clone(&track), &opts)
        })
        .collect()
}

pub fn batch_stats(reports: &[RaceReport]) -> BatchStats {
    let runs = reports.len();
    let mean = |f: fn(&RaceReport) -> u64| {
        if runs == 0 {
            0.0
        } else {
            reports.iter().map(|r| f(r) as f64).sum::<f64>() / runs as f64
        }
    };
    BatchStats {
        runs,
        mean_collisions: mean(|r| r.collisions),
        mean_containments: mean(|r| r.containments),
        max_collisions: reports.iter().map(|r| r.collisions).max().unwrap_or(0),
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
