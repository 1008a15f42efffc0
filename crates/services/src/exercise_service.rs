use std::sync::Arc;

use serde_json::Value;

use motionaid_core::{Clock, Effect, ExerciseSession};

use crate::channel::ExerciseChannel;
use crate::error::ExerciseServiceError;
use crate::feed;
use crate::speech::SpeechNotifier;

/// What became of one inbound feed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The update was applied to the session.
    Applied { completed_now: bool },
    /// The session dropped it (completed, paused, or not streaming).
    Dropped,
    /// The payload carried nothing usable.
    Ignored,
}

/// Runs the session state machine's effects against the real world.
///
/// Owns nothing page-specific; one instance serves every exercise page.
/// Collaborators come in as trait objects so tests can substitute fakes.
#[derive(Clone)]
pub struct ExerciseService {
    clock: Clock,
    channel: Arc<dyn ExerciseChannel>,
    speech: Arc<dyn SpeechNotifier>,
    voice_hint: Option<String>,
}

impl ExerciseService {
    #[must_use]
    pub fn new(
        clock: Clock,
        channel: Arc<dyn ExerciseChannel>,
        speech: Arc<dyn SpeechNotifier>,
    ) -> Self {
        Self {
            clock,
            channel,
            speech,
            voice_hint: None,
        }
    }

    /// Prefer a synthesis voice whose name contains the hint.
    #[must_use]
    pub fn with_voice_hint(mut self, voice_hint: Option<String>) -> Self {
        self.voice_hint = voice_hint;
        self
    }

    /// Start or retry a session: stop-then-start on the backend, full reset,
    /// start announcement.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseServiceError::Channel` when the backend connection
    /// is gone.
    pub fn start(&self, session: &mut ExerciseSession) -> Result<(), ExerciseServiceError> {
        log::info!(
            "session {}: starting {}",
            session.id(),
            session.config().mode().title()
        );
        let effects = session.start(self.clock.now());
        self.run(effects)
    }

    /// Apply one raw feed payload to a session.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseServiceError::Channel` only if an effect needs the
    /// channel and it is gone; drops and unusable payloads are outcomes,
    /// not errors.
    pub fn apply_feed(
        &self,
        session: &mut ExerciseSession,
        payload: &Value,
    ) -> Result<FeedOutcome, ExerciseServiceError> {
        let Some(update) = feed::decode(session.config().mode(), payload) else {
            log::debug!("session {}: unusable feed payload ignored", session.id());
            return Ok(FeedOutcome::Ignored);
        };

        let outcome = session.apply_update(&update);
        if !outcome.applied {
            return Ok(FeedOutcome::Dropped);
        }
        let completed_now = outcome.completed_now;
        self.run(outcome.effects)?;
        if completed_now {
            log::info!(
                "session {}: completed at metric {:.1}, resting",
                session.id(),
                session.metric()
            );
        }
        Ok(FeedOutcome::Applied { completed_now })
    }

    /// Leaving the page: always stop this mode on the backend.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseServiceError::Channel` when the backend connection
    /// is gone.
    pub fn stop(&self, session: &mut ExerciseSession) -> Result<(), ExerciseServiceError> {
        log::info!(
            "session {}: stopping {}",
            session.id(),
            session.config().mode().title()
        );
        self.run(session.leave())
    }

    fn run(&self, effects: Vec<Effect>) -> Result<(), ExerciseServiceError> {
        for effect in effects {
            match effect {
                Effect::Command(command) => self.channel.send(command)?,
                Effect::CancelSpeech => self.speech.cancel_all(),
                Effect::Speak(text) => self.speech.speak(&text, self.voice_hint.as_deref()),
            }
        }
        Ok(())
    }
}
