//! Computer-controlled drivers.

pub mod difficulty;
pub mod driver;
pub mod mistake;
pub mod overtake;

pub use difficulty::Difficulty;
pub use driver::AiDriver;
pub use mistake::{Mistake, MistakeState};
