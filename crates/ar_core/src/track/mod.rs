//! Spline geometry engine: control points in, immutable track geometry out.

pub mod boundary;
pub mod computed;
pub mod grid;
pub mod kerbs;
pub mod racing_line;
pub mod spline;

pub use boundary::Winding;
pub use computed::{build, build_with_config, ComputedTrack, DrsZone, PathPoint};
pub use grid::GridSlot;
pub use kerbs::{KerbSide, KerbStrip};
pub use racing_line::{RacingLine, RacingLinePoint, RacingLineVariant};
