use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The three exercise modes the tracking backend knows about.
///
/// Each mode pins down the wire vocabulary of the consumed protocol: the
/// inbound feed event, the payload field names, and the start/stop commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseMode {
    FistOpenClose,
    WristRotation,
    HandsRaisedHold,
}

impl ExerciseMode {
    /// Inbound event name carrying this mode's annotated frames.
    #[must_use]
    pub fn feed_event(&self) -> &'static str {
        match self {
            Self::FistOpenClose => "video_feed",
            Self::WristRotation => "rotation_feed",
            Self::HandsRaisedHold => "joinhands_feed",
        }
    }

    /// Payload field holding the base64 JPEG frame.
    ///
    /// The rotation feed names it differently from the other two.
    #[must_use]
    pub fn frame_field(&self) -> &'static str {
        match self {
            Self::WristRotation => "image",
            Self::FistOpenClose | Self::HandsRaisedHold => "frame",
        }
    }

    /// Payload field holding the progress metric.
    #[must_use]
    pub fn metric_field(&self) -> &'static str {
        match self {
            Self::FistOpenClose | Self::WristRotation => "count",
            Self::HandsRaisedHold => "hold_time",
        }
    }

    /// Human-readable exercise title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::FistOpenClose => "Fist Open & Close",
            Self::WristRotation => "Wrist Rotation",
            Self::HandsRaisedHold => "Hands-Raised Hold",
        }
    }
}

/// Outbound fire-and-forget commands to the tracking backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCommand {
    Start(ExerciseMode),
    Stop(ExerciseMode),
}

impl BackendCommand {
    /// Command name as it appears on the wire.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Start(ExerciseMode::FistOpenClose) => "start_openclose",
            Self::Stop(ExerciseMode::FistOpenClose) => "stop_openclose",
            Self::Start(ExerciseMode::WristRotation) => "start_rotation",
            Self::Stop(ExerciseMode::WristRotation) => "stop_rotation",
            Self::Start(ExerciseMode::HandsRaisedHold) => "start_joinhands",
            Self::Stop(ExerciseMode::HandsRaisedHold) => "stop_joinhands",
        }
    }
}

/// Completion threshold for a session.
///
/// Rep targets are integer counts reported monotonically by the backend; a
/// hold target is a continuously-sampled duration that may fluctuate down
/// when the tracked pose is lost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    Reps(u32),
    HoldSeconds(f64),
}

impl Target {
    /// Threshold value as a float, for progress arithmetic.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            Self::Reps(n) => f64::from(*n),
            Self::HoldSeconds(secs) => *secs,
        }
    }

    /// Whether an applied metric completes the session.
    #[must_use]
    pub fn reached(&self, metric: f64) -> bool {
        metric >= self.value()
    }

    /// Whether an applied metric triggers the halfway announcement.
    ///
    /// Rep targets use a threshold crossing against `floor(target / 2)` so a
    /// count that jumps past the midpoint still announces. The continuous
    /// hold target checks the half-open band `[target/2, target)` instead: a
    /// sample already at or past the target belongs to completion alone.
    #[must_use]
    pub fn halfway_reached(&self, metric: f64) -> bool {
        match self {
            Self::Reps(n) => metric >= f64::from(n / 2),
            Self::HoldSeconds(secs) => metric >= secs / 2.0 && metric < *secs,
        }
    }

    /// True for continuously-sampled targets (hold duration).
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::HoldSeconds(_))
    }
}

/// Spoken prompt texts, one per announcement gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompts {
    pub start: String,
    pub halfway: String,
    pub completion: String,
}

/// Everything that distinguishes one exercise page from another.
///
/// The three built-in configurations parameterize a single session state
/// machine and a single page component; nothing else differs per exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseConfig {
    mode: ExerciseMode,
    target: Target,
    prompts: Prompts,
    tips: Vec<&'static str>,
}

impl ExerciseConfig {
    /// Builds a configuration, validating the target and prompt texts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTarget` for a non-positive target and
    /// `ConfigError::EmptyPrompt` for a blank prompt text.
    pub fn new(
        mode: ExerciseMode,
        target: Target,
        prompts: Prompts,
        tips: Vec<&'static str>,
    ) -> Result<Self, ConfigError> {
        if target.value() <= 0.0 {
            return Err(ConfigError::InvalidTarget {
                raw: target.value(),
            });
        }
        for (which, text) in [
            ("start", &prompts.start),
            ("halfway", &prompts.halfway),
            ("completion", &prompts.completion),
        ] {
            if text.trim().is_empty() {
                return Err(ConfigError::EmptyPrompt { which });
            }
        }

        Ok(Self {
            mode,
            target,
            prompts,
            tips,
        })
    }

    /// The built-in configuration for a mode.
    #[must_use]
    pub fn for_mode(mode: ExerciseMode) -> Self {
        match mode {
            ExerciseMode::FistOpenClose => Self::fist_open_close(),
            ExerciseMode::WristRotation => Self::wrist_rotation(),
            ExerciseMode::HandsRaisedHold => Self::hands_raised_hold(),
        }
    }

    /// Fist open/close: 15 repetitions.
    #[must_use]
    pub fn fist_open_close() -> Self {
        Self::new(
            ExerciseMode::FistOpenClose,
            Target::Reps(15),
            Prompts {
                start: "Let's begin your fist open close exercise. Start slowly and steadily."
                    .to_string(),
                halfway: "Great job! You're halfway there. Keep it up.".to_string(),
                completion: "Excellent work! Take a short rest.".to_string(),
            },
            vec![
                "Position yourself clearly",
                "Move slowly",
                "Keep shoulders aligned",
                "Take breaks when needed",
            ],
        )
        .expect("built-in config is valid")
    }

    /// Wrist rotation: 5 repetitions.
    #[must_use]
    pub fn wrist_rotation() -> Self {
        Self::new(
            ExerciseMode::WristRotation,
            Target::Reps(5),
            Prompts {
                start: "Let's begin your wrist rotation exercise. Rotate your wrist slowly and steadily."
                    .to_string(),
                halfway: "Great job! You're halfway through this exercise. Keep it up."
                    .to_string(),
                completion: "Excellent work! Wrist rotation exercise completed. Take a short rest."
                    .to_string(),
            },
            vec![
                "Position yourself clearly",
                "Rotate wrist slowly and fully",
                "Keep arm steady",
                "Take breaks when needed",
            ],
        )
        .expect("built-in config is valid")
    }

    /// Hands-raised hold: 10 seconds held.
    #[must_use]
    pub fn hands_raised_hold() -> Self {
        Self::new(
            ExerciseMode::HandsRaisedHold,
            Target::HoldSeconds(10.0),
            Prompts {
                start: "Let's begin! Raise your hands above your head and hold the position."
                    .to_string(),
                halfway: "Halfway there! Keep holding your arms up!".to_string(),
                completion: "Excellent! You held your position for 10 seconds. Take a short break."
                    .to_string(),
            },
            vec![
                "Position yourself clearly",
                "Raise both hands above your head",
                "Hold steady for 10 seconds",
                "Keep your arms close together for better accuracy",
            ],
        )
        .expect("built-in config is valid")
    }

    #[must_use]
    pub fn mode(&self) -> ExerciseMode {
        self.mode
    }

    #[must_use]
    pub fn target(&self) -> Target {
        self.target
    }

    #[must_use]
    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    #[must_use]
    pub fn tips(&self) -> &[&'static str] {
        &self.tips
    }
}
