//! # ar_core - Arcade Racing Simulation Core
//!
//! Track geometry, vehicle dynamics and computer-controlled drivers for a
//! top-down arcade racer, with a JSON API for embedding in game hosts.
//!
//! ## Features
//! - Closed Catmull-Rom tracks with boundaries, kerbs and three racing lines
//! - Kinematic car model with drift, wall containment and car-to-car contact
//! - Skill-scaled AI drivers with mistakes and overtaking
//! - Deterministic headless races (same seed = same result)

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Physics helpers take many scalar tuning parameters
#![allow(clippy::too_many_arguments)]
// Loop style - can fix incrementally
#![allow(clippy::needless_range_loop)]

pub mod ai;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod track;

// Re-export main API functions
pub use ai::{AiDriver, Difficulty};
pub use api::{build_track_json, simulate_race, simulate_race_json, RaceRequest, RaceResponse};
pub use config::EngineConfig;
pub use engine::{RaceSession, Simulation};
pub use error::{Result, TrackError};
pub use models::{ControlInput, TrackDescription, VehicleConfig, VehicleState};
pub use track::ComputedTrack;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
