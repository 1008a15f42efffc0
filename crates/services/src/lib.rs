#![forbid(unsafe_code)]

pub mod channel;
pub mod error;
pub mod exercise_service;
pub mod feed;
pub mod health;
pub mod socket;
pub mod speech;

pub use motionaid_core::Clock;

pub use channel::{ChannelStatus, EventBus, ExerciseChannel, OfflineChannel, Subscription};
pub use error::{ChannelError, ExerciseServiceError, HealthError};
pub use exercise_service::{ExerciseService, FeedOutcome};
pub use health::BackendHealth;
pub use socket::SocketChannel;
pub use speech::{PlatformSpeech, SpeechNotifier};
