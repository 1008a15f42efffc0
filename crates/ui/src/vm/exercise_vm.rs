use serde_json::Value;

use motionaid_core::model::{ExerciseConfig, ExerciseMode, Target};
use motionaid_core::session::{REST_ADJUST_STEP_SECS, RestTick};
use motionaid_core::{ExerciseSession, SessionPhase};
use services::{ExerciseService, FeedOutcome};

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExerciseIntent {
    Start,
    TogglePause,
    ShortenRest,
    ExtendRest,
}

/// Presentation wrapper around one exercise session.
///
/// Owns the session for the lifetime of a page mount and turns its raw
/// state into display strings. All effect execution goes through the
/// injected `ExerciseService`.
pub struct ExerciseVm {
    session: ExerciseSession,
}

impl ExerciseVm {
    #[must_use]
    pub fn new(mode: ExerciseMode) -> Self {
        Self {
            session: ExerciseSession::new(ExerciseConfig::for_mode(mode)),
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn session(&self) -> &ExerciseSession {
        &self.session
    }

    /// # Errors
    ///
    /// Returns `ViewError::BackendUnreachable` when a backend command could
    /// not be sent.
    pub fn dispatch(
        &mut self,
        service: &ExerciseService,
        intent: ExerciseIntent,
    ) -> Result<(), ViewError> {
        match intent {
            ExerciseIntent::Start => service
                .start(&mut self.session)
                .map_err(|_| ViewError::BackendUnreachable),
            ExerciseIntent::TogglePause => {
                self.session.toggle_pause();
                Ok(())
            }
            ExerciseIntent::ShortenRest => {
                self.session.adjust_rest(-REST_ADJUST_STEP_SECS);
                Ok(())
            }
            ExerciseIntent::ExtendRest => {
                self.session.adjust_rest(REST_ADJUST_STEP_SECS);
                Ok(())
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::BackendUnreachable` when a resulting effect could
    /// not reach the backend.
    pub fn apply_feed(
        &mut self,
        service: &ExerciseService,
        payload: &Value,
    ) -> Result<FeedOutcome, ViewError> {
        service
            .apply_feed(&mut self.session, payload)
            .map_err(|_| ViewError::BackendUnreachable)
    }

    pub fn rest_tick(&mut self) -> RestTick {
        self.session.rest_tick()
    }

    /// Leaving the page. The backend may already be gone, in which case
    /// there is nothing left to surface.
    pub fn stop(&mut self, service: &ExerciseService) {
        let _ = service.stop(&mut self.session);
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        self.session.config().mode().title()
    }

    #[must_use]
    pub fn tips(&self) -> &[&'static str] {
        self.session.config().tips()
    }

    #[must_use]
    pub fn metric_label(&self) -> String {
        match self.session.config().target() {
            Target::Reps(n) => format!("{:.0} / {n}", self.session.metric()),
            Target::HoldSeconds(secs) => {
                format!("{:.1}s / {secs:.0}s", self.session.metric())
            }
        }
    }

    #[must_use]
    pub fn metric_name(&self) -> &'static str {
        if self.session.config().target().is_continuous() {
            "Hold Time"
        } else {
            "Reps"
        }
    }

    #[must_use]
    pub fn accuracy_label(&self) -> String {
        format!("{:.0}%", self.session.accuracy())
    }

    #[must_use]
    pub fn rest_label(&self) -> String {
        format!("{}s", self.session.countdown_secs())
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.session.progress_percent()
    }

    /// Latest annotated frame as a data url, ready for an `img` src.
    #[must_use]
    pub fn frame_src(&self) -> Option<String> {
        self.session
            .video_frame()
            .map(|frame| format!("data:image/jpeg;base64,{frame}"))
    }

    #[must_use]
    pub fn start_label(&self) -> &'static str {
        if self.session.completed() {
            "Try Again"
        } else {
            "Start Exercise"
        }
    }

    #[must_use]
    pub fn pause_label(&self) -> &'static str {
        if self.session.paused() {
            "Resume"
        } else {
            "Pause"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use motionaid_core::model::BackendCommand;
    use motionaid_core::time::fixed_clock;
    use services::channel::{ChannelStatus, EventBus, ExerciseChannel, Subscription};
    use services::error::ChannelError;
    use services::speech::SpeechNotifier;

    #[derive(Clone, Default)]
    struct NullChannel {
        bus: EventBus,
    }

    impl ExerciseChannel for NullChannel {
        fn subscribe(&self, event: &str) -> Subscription {
            self.bus.subscribe(event)
        }

        fn send(&self, _command: BackendCommand) -> Result<(), ChannelError> {
            Ok(())
        }

        fn status(&self) -> ChannelStatus {
            ChannelStatus::Connected
        }
    }

    struct SilentSpeech;

    impl SpeechNotifier for SilentSpeech {
        fn cancel_all(&self) {}
        fn speak(&self, _text: &str, _voice_hint: Option<&str>) {}
        fn available(&self) -> bool {
            false
        }
    }

    fn service() -> ExerciseService {
        ExerciseService::new(
            fixed_clock(),
            Arc::new(NullChannel::default()),
            Arc::new(SilentSpeech),
        )
    }

    #[test]
    fn rep_and_hold_metrics_format_differently() {
        let service = service();

        let mut reps = ExerciseVm::new(ExerciseMode::FistOpenClose);
        reps.dispatch(&service, ExerciseIntent::Start).unwrap();
        reps.apply_feed(&service, &json!({"count": 7, "accuracy": 82.4}))
            .unwrap();
        assert_eq!(reps.metric_label(), "7 / 15");
        assert_eq!(reps.metric_name(), "Reps");
        assert_eq!(reps.accuracy_label(), "82%");

        let mut hold = ExerciseVm::new(ExerciseMode::HandsRaisedHold);
        hold.dispatch(&service, ExerciseIntent::Start).unwrap();
        hold.apply_feed(&service, &json!({"hold_time": 6.04})).unwrap();
        assert_eq!(hold.metric_label(), "6.0s / 10s");
        assert_eq!(hold.metric_name(), "Hold Time");
    }

    #[test]
    fn frame_src_is_a_jpeg_data_url() {
        let service = service();
        let mut vm = ExerciseVm::new(ExerciseMode::WristRotation);
        assert_eq!(vm.frame_src(), None);

        vm.dispatch(&service, ExerciseIntent::Start).unwrap();
        vm.apply_feed(&service, &json!({"image": "aW1n", "count": 1}))
            .unwrap();
        assert_eq!(vm.frame_src().as_deref(), Some("data:image/jpeg;base64,aW1n"));
    }

    #[test]
    fn start_label_flips_to_retry_after_completion() {
        let service = service();
        let mut vm = ExerciseVm::new(ExerciseMode::WristRotation);
        assert_eq!(vm.start_label(), "Start Exercise");

        vm.dispatch(&service, ExerciseIntent::Start).unwrap();
        vm.apply_feed(&service, &json!({"count": 5})).unwrap();
        assert_eq!(vm.phase(), SessionPhase::Resting);
        assert_eq!(vm.start_label(), "Try Again");

        vm.dispatch(&service, ExerciseIntent::Start).unwrap();
        assert_eq!(vm.start_label(), "Start Exercise");
    }

    #[test]
    fn rest_intents_adjust_the_countdown() {
        let service = service();
        let mut vm = ExerciseVm::new(ExerciseMode::FistOpenClose);
        vm.dispatch(&service, ExerciseIntent::Start).unwrap();
        vm.apply_feed(&service, &json!({"count": 15})).unwrap();
        assert_eq!(vm.rest_label(), "30s");

        vm.dispatch(&service, ExerciseIntent::ExtendRest).unwrap();
        assert_eq!(vm.rest_label(), "35s");
        vm.dispatch(&service, ExerciseIntent::ShortenRest).unwrap();
        vm.dispatch(&service, ExerciseIntent::ShortenRest).unwrap();
        assert_eq!(vm.rest_label(), "25s");

        assert_eq!(vm.rest_tick(), RestTick::Ticking { remaining: 24 });
    }

    #[test]
    fn pause_label_follows_the_toggle() {
        let service = service();
        let mut vm = ExerciseVm::new(ExerciseMode::FistOpenClose);
        vm.dispatch(&service, ExerciseIntent::Start).unwrap();
        assert_eq!(vm.pause_label(), "Pause");

        vm.dispatch(&service, ExerciseIntent::TogglePause).unwrap();
        assert_eq!(vm.pause_label(), "Resume");
        assert_eq!(vm.phase(), SessionPhase::Paused);

        vm.dispatch(&service, ExerciseIntent::TogglePause).unwrap();
        assert_eq!(vm.pause_label(), "Pause");
    }
}
