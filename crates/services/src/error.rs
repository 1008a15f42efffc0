//! Shared error types for the services crate.

use thiserror::Error;

/// Errors from the real-time channel adapter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChannelError {
    #[error("backend connection failed")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("backend connection is closed")]
    Disconnected,
}

/// Errors from the backend preflight probe.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HealthError {
    #[error("backend url is not probeable: {raw}")]
    InvalidUrl { raw: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ExerciseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExerciseServiceError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
}
