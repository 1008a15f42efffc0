//! On-device speech synthesis.

use std::sync::{Mutex, PoisonError};

use tts::Tts;

/// Speaks motivational prompts, one utterance at a time.
///
/// Call sites always `cancel_all` immediately before speaking a new prompt
/// (the session machine emits the effect pair), so at most one utterance is
/// ever audible.
pub trait SpeechNotifier: Send + Sync {
    /// Cancels any utterance currently queued or playing.
    fn cancel_all(&self);

    /// Fires a one-shot utterance. Failures are logged, never propagated:
    /// speech is a nicety, not a dependency.
    fn speak(&self, text: &str, voice_hint: Option<&str>);

    /// Whether a speech engine is actually present.
    fn available(&self) -> bool;
}

/// `SpeechNotifier` over the platform text-to-speech engine.
///
/// Construction degrades to an unavailable notifier when no engine exists;
/// the UI shows a capability warning instead of failing.
pub struct PlatformSpeech {
    engine: Mutex<Option<Tts>>,
}

impl PlatformSpeech {
    #[must_use]
    pub fn new() -> Self {
        let engine = match Tts::default() {
            Ok(tts) => Some(tts),
            Err(err) => {
                log::warn!("speech synthesis unavailable: {err}");
                None
            }
        };
        Self {
            engine: Mutex::new(engine),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Tts>> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PlatformSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechNotifier for PlatformSpeech {
    fn cancel_all(&self) {
        if let Some(tts) = self.lock().as_mut() {
            if let Err(err) = tts.stop() {
                log::warn!("failed to cancel speech: {err}");
            }
        }
    }

    fn speak(&self, text: &str, voice_hint: Option<&str>) {
        let mut guard = self.lock();
        let Some(tts) = guard.as_mut() else {
            log::debug!("no speech engine, skipping prompt {text:?}");
            return;
        };
        if let Some(hint) = voice_hint {
            apply_voice_hint(tts, hint);
        }
        if let Err(err) = tts.speak(text, true) {
            log::warn!("speech failed: {err}");
        }
    }

    fn available(&self) -> bool {
        self.lock().is_some()
    }
}

fn apply_voice_hint(tts: &mut Tts, hint: &str) {
    let wanted = hint.to_lowercase();
    match tts.voices() {
        Ok(voices) => {
            if let Some(voice) = voices
                .iter()
                .find(|voice| voice.name().to_lowercase().contains(&wanted))
            {
                if let Err(err) = tts.set_voice(voice) {
                    log::warn!("could not select voice {hint:?}: {err}");
                }
            } else {
                log::debug!("no voice matching {hint:?}, using the default");
            }
        }
        Err(err) => log::debug!("voice enumeration failed: {err}"),
    }
}
