#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod session;
pub mod time;

pub use error::ConfigError;
pub use session::{Effect, ExerciseSession, RestTick, SessionPhase, UpdateOutcome};
pub use time::Clock;
