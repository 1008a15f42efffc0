use thiserror::Error;

/// Errors from building an exercise configuration.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("exercise target must be positive, got {raw}")]
    InvalidTarget { raw: f64 },

    #[error("announcement prompt for {which} must not be empty")]
    EmptyPrompt { which: &'static str },
}
