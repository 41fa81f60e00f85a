pub mod track_description;
pub mod vehicle;

pub use track_description::{ControlPoint, RunoffType, TrackDescription};
pub use vehicle::{ControlInput, VehicleConfig, VehicleState, VehicleStatePatch};
