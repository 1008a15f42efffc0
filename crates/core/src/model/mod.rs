mod announcement;
mod exercise;
mod feed;
mod ids;

pub use announcement::{Announcement, AnnouncementGates};
pub use exercise::{BackendCommand, ExerciseConfig, ExerciseMode, Prompts, Target};
pub use feed::FrameUpdate;
pub use ids::SessionId;
