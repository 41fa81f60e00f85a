//! Vehicle dynamics and the per-tick loop.

pub mod collision;
pub mod containment;
pub mod math;
pub mod session;
pub mod simulation;
pub mod timestep;
pub mod vehicle_physics;

pub use collision::{check_car_collision, resolve_car_collision, CollisionInfo};
pub use containment::{constrain_to_track_by_distance, BoundarySample, Containment};
pub use session::{RaceSession, SessionSummary, VehicleSummary};
pub use simulation::{ControlSource, Simulation, TickReport};
pub use timestep::FixedTimestep;
pub use vehicle_physics::step;
