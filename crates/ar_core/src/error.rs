use std::path::PathBuf;

use thiserror::Error;

/// Construction-time failures. Everything here is raised before a vehicle
/// ever touches the track; the per-tick path never returns an error.
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Track needs at least 3 control points, found {found}")]
    TooFewControlPoints { found: usize },

    #[error("Control point {index} has a non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { index: usize, x: f32, y: f32 },

    #[error("Control point {index} has invalid width override {width}")]
    InvalidWidth { index: usize, width: f32 },

    #[error("Track width must be positive and finite, got {width}")]
    InvalidTrackWidth { width: f32 },

    #[error("Start index {index} out of range for {len} control points")]
    StartIndexOutOfRange { index: usize, len: usize },

    #[error("Control point {index} has sector {sector}, expected 1..=3")]
    InvalidSector { index: usize, sector: u8 },

    #[error("Lap count must be at least 1")]
    InvalidLapCount,

    #[error("Race duration must be in (0, {max}] seconds, got {seconds}")]
    InvalidDuration { seconds: f32, max: f32 },

    #[error("Fixed step must be finite and within [{min}, {max}], got {fixed_dt}")]
    InvalidTimestep { fixed_dt: f32, min: f32, max: f32 },

    #[error("Driver id '{id}' appears more than once")]
    DuplicateDriver { id: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrackError {
    /// True for errors caused by the authored data itself, as opposed to
    /// failing to read or parse it.
    pub fn is_validation(&self) -> bool {
        !matches!(self, TrackError::Json(_) | TrackError::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
