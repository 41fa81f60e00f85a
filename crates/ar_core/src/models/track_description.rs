//! Authored track description (loader output, geometry input)

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};

/// Surface beyond the track edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RunoffType {
    #[default]
    Tarmac,
    Gravel,
    Barrier,
    Grass,
}

/// Authored waypoint. Insertion order is loop order; the last point connects
/// back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ControlPoint {
    pub x: f32,
    pub y: f32,
    /// Overrides `TrackDescription::track_width` around this point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runoff: Option<RunoffType>,
    #[serde(default)]
    pub kerb: bool,
    #[serde(default)]
    pub drs: bool,
    /// Timing sector, 1..=3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ControlPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, width: None, runoff: None, kerb: false, drs: false, sector: None, name: None }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_kerb(mut self) -> Self {
        self.kerb = true;
        self
    }

    pub fn with_drs(mut self) -> Self {
        self.drs = true;
        self
    }

    pub fn with_sector(mut self, sector: u8) -> Self {
        self.sector = Some(sector);
        self
    }

    pub fn with_runoff(mut self, runoff: RunoffType) -> Self {
        self.runoff = Some(runoff);
        self
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

fn default_laps() -> u32 {
    3
}

/// A circuit as delivered by the track loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackDescription {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub country: String,
    /// Display-only length label, e.g. "5.4 km"
    #[serde(default, rename = "length")]
    pub length_display: String,
    #[serde(default = "default_laps")]
    pub laps: u32,
    /// Base width for control points without an override
    pub track_width: f32,
    pub control_points: Vec<ControlPoint>,
    /// Control point that carries the start/finish line
    #[serde(default)]
    pub start_index: usize,
}

impl TrackDescription {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        track_width: f32,
        control_points: Vec<ControlPoint>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            country: String::new(),
            length_display: String::new(),
            laps: default_laps(),
            track_width,
            control_points,
            start_index: 0,
        }
    }

    /// Parses and validates a JSON track description.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let desc: Self = serde_json::from_str(json)?;
        desc.validate()?;
        Ok(desc)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| TrackError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&json)
    }

    /// Rejects malformed descriptions. Nothing is repaired.
    pub fn validate(&self) -> Result<()> {
        let len = self.control_points.len();
        if len < 3 {
            return Err(TrackError::TooFewControlPoints { found: len });
        }
        if !(self.track_width.is_finite() && self.track_width > 0.0) {
            return Err(TrackError::InvalidTrackWidth { width: self.track_width });
        }
        if self.start_index >= len {
            return Err(TrackError::StartIndexOutOfRange { index: self.start_index, len });
        }
        if self.laps == 0 {
            return Err(TrackError::InvalidLapCount);
        }

        for (index, cp) in self.control_points.iter().enumerate() {
            if !(cp.x.is_finite() && cp.y.is_finite()) {
                return Err(TrackError::NonFiniteCoordinate { index, x: cp.x, y: cp.y });
            }
            if let Some(width) = cp.width {
                if !(width.is_finite() && width > 0.0) {
                    return Err(TrackError::InvalidWidth { index, width });
                }
            }
            if let Some(sector) = cp.sector {
                if !(1..=3).contains(&sector) {
                    return Err(TrackError::InvalidSector { index, sector });
                }
            }
        }
        Ok(())
    }

    /// Effective width at a control point.
    pub fn width_at(&self, index: usize) -> f32 {
        self.control_points[index].width.unwrap_or(self.track_width)
    }

    /// JSON schema for authoring tools.
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(TrackDescription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn triangle() -> TrackDescription {
        TrackDescription::new(
            "tri",
            "Triangle",
            40.0,
            vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(200.0, 0.0), ControlPoint::new(100.0, 150.0)],
        )
    }

    #[test]
    fn test_valid_triangle() {
        assert!(triangle().validate().is_ok());
    }

    #[test]
    fn test_too_few_points() {
        let mut desc = triangle();
        desc.control_points.pop();
        assert!(matches!(desc.validate(), Err(TrackError::TooFewControlPoints { found: 2 })));
    }

    #[test]
    fn test_non_finite_coordinate() {
        let mut desc = triangle();
        desc.control_points[1].y = f32::NAN;
        assert!(matches!(desc.validate(), Err(TrackError::NonFiniteCoordinate { index: 1, .. })));
    }

    #[test]
    fn test_bad_sector_and_width() {
        let mut desc = triangle();
        desc.control_points[2].sector = Some(4);
        assert!(matches!(desc.validate(), Err(TrackError::InvalidSector { index: 2, sector: 4 })));

        let mut desc = triangle();
        desc.control_points[0].width = Some(-5.0);
        assert!(matches!(desc.validate(), Err(TrackError::InvalidWidth { index: 0, .. })));
    }

    #[test]
    fn test_start_index_out_of_range() {
        let mut desc = triangle();
        desc.start_index = 3;
        assert!(matches!(desc.validate(), Err(TrackError::StartIndexOutOfRange { index: 3, len: 3 })));
    }

    #[test]
    fn test_from_json_camel_case() {
        let json = r#"{
            "id": "oval",
            "name": "Oval",
            "country": "Nowhere",
            "length": "1.2 km",
            "laps": 5,
            "trackWidth": 60,
            "startIndex": 1,
            "controlPoints": [
                {"x": 0, "y": 0, "kerb": true, "runoff": "gravel"},
                {"x": 300, "y": 0, "width": 80, "sector": 2},
                {"x": 300, "y": 200, "drs": true},
                {"x": 0, "y": 200, "name": "Hairpin"}
            ]
        }"#;
        let desc = TrackDescription::from_json_str(json).unwrap();
        assert_eq!(desc.laps, 5);
        assert_eq!(desc.start_index, 1);
        assert_eq!(desc.length_display, "1.2 km");
        assert_eq!(desc.control_points[0].runoff, Some(RunoffType::Gravel));
        assert!(desc.control_points[0].kerb);
        assert_eq!(desc.width_at(1), 80.0);
        assert_eq!(desc.width_at(2), 60.0);
        assert_eq!(desc.control_points[3].name.as_deref(), Some("Hairpin"));
    }

    #[test]
    fn test_non_numeric_coordinate_rejected() {
        let json = r#"{"id":"x","name":"x","trackWidth":40,"controlPoints":[
            {"x":"left","y":0},{"x":1,"y":0},{"x":0,"y":1}]}"#;
        let err = TrackDescription::from_json_str(json).unwrap_err();
        assert!(matches!(err, TrackError::Json(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&triangle()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = TrackDescription::from_path(file.path()).unwrap();
        assert_eq!(loaded, triangle());

        let missing = TrackDescription::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(missing, TrackError::Io { .. }));
    }

    #[test]
    fn test_schema_mentions_control_points() {
        let schema = serde_json::to_string(&TrackDescription::json_schema()).unwrap();
        assert!(schema.contains("controlPoints"));
    }
}
