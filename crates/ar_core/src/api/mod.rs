pub mod race_json;

pub use race_json::{
    build_track_json, simulate_race, simulate_race_json, DriverRequest, RaceRequest, RaceResponse,
    VehicleResult,
};
