use chrono::{DateTime, Utc};

use crate::model::{
    Announcement, AnnouncementGates, BackendCommand, ExerciseConfig, FrameUpdate, SessionId,
};

/// Rest countdown starting value, in seconds.
pub const REST_DEFAULT_SECS: u32 = 30;
/// Step applied by the shorten/extend rest controls.
pub const REST_ADJUST_STEP_SECS: i32 = 5;

/// Side effects a session operation asks its runtime to perform.
///
/// The machine itself does no I/O; the service layer executes these in
/// order. `CancelSpeech` always precedes a `Speak` of the same batch, which
/// is what keeps at most one utterance audible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Command(BackendCommand),
    CancelSpeech,
    Speak(String),
}

/// Observable phase of a session, derived from the underlying flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Streaming,
    Paused,
    Resting,
}

/// What `apply_update` did with an inbound payload.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    /// False when the update was dropped (completed, paused, or not
    /// streaming). A drop is expected behavior, not an error.
    pub applied: bool,
    /// True on the update that crossed the completion threshold.
    pub completed_now: bool,
    pub effects: Vec<Effect>,
}

impl UpdateOutcome {
    fn dropped() -> Self {
        Self {
            applied: false,
            completed_now: false,
            effects: Vec::new(),
        }
    }
}

/// Result of one rest-timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestTick {
    /// Not resting; the tick was ignored.
    Inactive,
    Ticking { remaining: u32 },
    /// The countdown hit zero: resting cleared, countdown restored.
    Finished,
}

/// Per-exercise session state machine.
///
/// One instance per exercise page mount. Owns every piece of per-session
/// mutable state and the guarded transitions between
/// `Idle → Streaming ⇄ Paused → Resting → Idle`. Completion is a compound
/// same-call transition into `Resting`, never a separate observable state.
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    id: SessionId,
    config: ExerciseConfig,
    metric: f64,
    accuracy: f64,
    video_frame: Option<String>,
    streaming: bool,
    paused: bool,
    completed: bool,
    resting: bool,
    countdown_secs: u32,
    gates: AnnouncementGates,
    started_at: Option<DateTime<Utc>>,
}

impl ExerciseSession {
    #[must_use]
    pub fn new(config: ExerciseConfig) -> Self {
        Self {
            id: SessionId::new(),
            config,
            metric: 0.0,
            accuracy: 0.0,
            video_frame: None,
            streaming: false,
            paused: false,
            completed: false,
            resting: false,
            countdown_secs: REST_DEFAULT_SECS,
            gates: AnnouncementGates::new(),
            started_at: None,
        }
    }

    /// Start or retry the session.
    ///
    /// Cancels any queued speech, stops whatever backend session might still
    /// be streaming for this mode, resets every field, issues the start
    /// command, and re-arms streaming. The start announcement fires on every
    /// invocation because the gates reset with the rest of the state.
    pub fn start(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        let mode = self.config.mode();
        let mut effects = vec![
            Effect::CancelSpeech,
            Effect::Command(BackendCommand::Stop(mode)),
        ];

        self.reset_state();
        self.started_at = Some(now);

        effects.push(Effect::Command(BackendCommand::Start(mode)));
        // resting was cleared by the reset above, so streaming never starts
        // while a rest period is considered active.
        self.streaming = true;
        self.paused = false;

        if self.gates.fire_once(Announcement::Start, true) {
            effects.push(Effect::Speak(self.config.prompts().start.clone()));
        }
        effects
    }

    /// Apply one inbound feed payload.
    ///
    /// Updates arriving while completed, paused, or not streaming are
    /// dropped. The halfway and completion gates are evaluated
    /// independently, so a single update crossing both thresholds fires
    /// both announcements in the same call.
    pub fn apply_update(&mut self, update: &FrameUpdate) -> UpdateOutcome {
        if self.completed || self.paused || !self.streaming {
            return UpdateOutcome::dropped();
        }

        if let Some(frame) = &update.frame {
            self.video_frame = Some(frame.clone());
        }
        if let Some(metric) = update.metric {
            self.metric = metric;
        }
        if let Some(accuracy) = update.accuracy {
            self.accuracy = accuracy.clamp(0.0, 100.0);
        }

        let mut effects = Vec::new();
        let target = self.config.target();

        if self
            .gates
            .fire_once(Announcement::Halfway, target.halfway_reached(self.metric))
        {
            effects.push(Effect::CancelSpeech);
            effects.push(Effect::Speak(self.config.prompts().halfway.clone()));
        }

        let mut completed_now = false;
        if self
            .gates
            .fire_once(Announcement::Completion, target.reached(self.metric))
        {
            // Compound transition: all of this is one atomic step from the
            // event loop's point of view.
            self.completed = true;
            self.streaming = false;
            self.resting = true;
            completed_now = true;
            effects.push(Effect::CancelSpeech);
            effects.push(Effect::Speak(self.config.prompts().completion.clone()));
        }

        UpdateOutcome {
            applied: true,
            completed_now,
            effects,
        }
    }

    /// Suspend or resume display-side application of updates.
    ///
    /// The backend keeps streaming; nothing else changes. A no-op outside
    /// the streaming state, so `Paused` is unreachable from `Resting`.
    pub fn toggle_pause(&mut self) {
        if self.streaming {
            self.paused = !self.paused;
        }
    }

    /// One second of rest elapsed.
    pub fn rest_tick(&mut self) -> RestTick {
        if !self.resting {
            return RestTick::Inactive;
        }
        if self.countdown_secs > 0 {
            self.countdown_secs -= 1;
        }
        if self.countdown_secs == 0 {
            self.resting = false;
            self.countdown_secs = REST_DEFAULT_SECS;
            RestTick::Finished
        } else {
            RestTick::Ticking {
                remaining: self.countdown_secs,
            }
        }
    }

    /// Shorten or extend the remaining rest, clamped at zero.
    ///
    /// Extending has no ceiling. Even when the countdown is adjusted down to
    /// zero, the rest period itself only ends via the next tick.
    pub fn adjust_rest(&mut self, delta_secs: i32) {
        if !self.resting {
            return;
        }
        let next = i64::from(self.countdown_secs) + i64::from(delta_secs);
        self.countdown_secs = u32::try_from(next.max(0)).unwrap_or(u32::MAX);
    }

    /// Leaving the page: always tell the backend to stop this mode.
    pub fn leave(&mut self) -> Vec<Effect> {
        self.streaming = false;
        self.paused = false;
        vec![Effect::Command(BackendCommand::Stop(self.config.mode()))]
    }

    fn reset_state(&mut self) {
        self.metric = 0.0;
        self.accuracy = 0.0;
        self.video_frame = None;
        self.streaming = false;
        self.paused = false;
        self.completed = false;
        self.resting = false;
        self.countdown_secs = REST_DEFAULT_SECS;
        self.gates.reset();
        self.started_at = None;
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.resting {
            SessionPhase::Resting
        } else if self.streaming && self.paused {
            SessionPhase::Paused
        } else if self.streaming {
            SessionPhase::Streaming
        } else {
            SessionPhase::Idle
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    #[must_use]
    pub fn metric(&self) -> f64 {
        self.metric
    }

    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    #[must_use]
    pub fn video_frame(&self) -> Option<&str> {
        self.video_frame.as_deref()
    }

    #[must_use]
    pub fn streaming(&self) -> bool {
        self.streaming
    }

    #[must_use]
    pub fn paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn resting(&self) -> bool {
        self.resting
    }

    #[must_use]
    pub fn countdown_secs(&self) -> u32 {
        self.countdown_secs
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Progress towards the target as a percentage, capped at 100.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        (self.metric / self.config.target().value() * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExerciseMode, FrameUpdate};
    use crate::time::fixed_now;

    fn started(config: ExerciseConfig) -> ExerciseSession {
        let mut session = ExerciseSession::new(config);
        let _ = session.start(fixed_now());
        session
    }

    fn spoken(effects: &[Effect]) -> Vec<&str> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Speak(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_issues_stop_then_start_and_announces() {
        let mut session = ExerciseSession::new(ExerciseConfig::wrist_rotation());
        let effects = session.start(fixed_now());

        assert_eq!(
            effects,
            vec![
                Effect::CancelSpeech,
                Effect::Command(BackendCommand::Stop(ExerciseMode::WristRotation)),
                Effect::Command(BackendCommand::Start(ExerciseMode::WristRotation)),
                Effect::Speak(session.config().prompts().start.clone()),
            ]
        );
        assert_eq!(session.phase(), SessionPhase::Streaming);
        assert!(session.started_at().is_some());
    }

    #[test]
    fn rep_sequence_announces_halfway_at_seven_and_completes_at_fifteen() {
        let mut session = started(ExerciseConfig::fist_open_close());
        let halfway = session.config().prompts().halfway.clone();
        let completion = session.config().prompts().completion.clone();

        for (value, expect) in [
            (0.0, vec![]),
            (3.0, vec![]),
            (7.0, vec![halfway.as_str()]),
            (8.0, vec![]),
            (15.0, vec![completion.as_str()]),
        ] {
            let outcome = session.apply_update(&FrameUpdate::metric(value));
            assert!(outcome.applied, "update {value} should apply");
            assert_eq!(spoken(&outcome.effects), expect, "at metric {value}");
        }
        assert!(session.completed());
        assert_eq!(session.phase(), SessionPhase::Resting);
    }

    #[test]
    fn hold_sequence_announces_within_band_and_completes_past_target() {
        let mut session = started(ExerciseConfig::hands_raised_hold());
        let halfway = session.config().prompts().halfway.clone();
        let completion = session.config().prompts().completion.clone();

        for (value, expect) in [
            (4.0, vec![]),
            (5.2, vec![halfway.as_str()]),
            (6.0, vec![]),
            (10.3, vec![completion.as_str()]),
        ] {
            let outcome = session.apply_update(&FrameUpdate::metric(value));
            assert_eq!(spoken(&outcome.effects), expect, "at metric {value}");
        }
        assert!(session.completed());
    }

    #[test]
    fn halfway_and_completion_may_fire_in_the_same_dispatch() {
        let mut session = started(ExerciseConfig::fist_open_close());
        let outcome = session.apply_update(&FrameUpdate::metric(15.0));

        assert_eq!(
            spoken(&outcome.effects),
            vec![
                session.config().prompts().halfway.as_str(),
                session.config().prompts().completion.as_str(),
            ]
        );
        assert!(outcome.completed_now);
    }

    #[test]
    fn every_speak_is_preceded_by_a_cancel() {
        let mut session = started(ExerciseConfig::fist_open_close());
        let outcome = session.apply_update(&FrameUpdate::metric(15.0));

        let effects = &outcome.effects;
        for (index, effect) in effects.iter().enumerate() {
            if matches!(effect, Effect::Speak(_)) {
                assert!(index > 0, "a speak must never be the first effect");
                assert_eq!(effects.get(index - 1), Some(&Effect::CancelSpeech));
            }
        }
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut session = started(ExerciseConfig::hands_raised_hold());
        let first = session.apply_update(&FrameUpdate::metric(10.0));
        assert!(first.completed_now);

        // Further updates are dropped outright; nothing is re-announced.
        let second = session.apply_update(&FrameUpdate::metric(12.0));
        assert!(!second.applied);
        assert!(second.effects.is_empty());
        assert!(session.completed());
    }

    #[test]
    fn updates_while_paused_leave_metric_and_accuracy_untouched() {
        let mut session = started(ExerciseConfig::fist_open_close());
        session.apply_update(&FrameUpdate {
            metric: Some(3.0),
            accuracy: Some(80.0),
            ..FrameUpdate::default()
        });

        session.toggle_pause();
        assert_eq!(session.phase(), SessionPhase::Paused);

        let outcome = session.apply_update(&FrameUpdate {
            metric: Some(9.0),
            accuracy: Some(10.0),
            ..FrameUpdate::default()
        });
        assert!(!outcome.applied);
        assert_eq!(session.metric(), 3.0);
        assert_eq!(session.accuracy(), 80.0);

        session.toggle_pause();
        assert_eq!(session.phase(), SessionPhase::Streaming);
    }

    #[test]
    fn updates_before_start_are_dropped() {
        let mut session = ExerciseSession::new(ExerciseConfig::fist_open_close());
        let outcome = session.apply_update(&FrameUpdate::metric(5.0));
        assert!(!outcome.applied);
        assert_eq!(session.metric(), 0.0);
    }

    #[test]
    fn pause_is_unreachable_while_resting() {
        let mut session = started(ExerciseConfig::hands_raised_hold());
        session.apply_update(&FrameUpdate::metric(10.0));
        assert_eq!(session.phase(), SessionPhase::Resting);

        session.toggle_pause();
        assert_eq!(session.phase(), SessionPhase::Resting);
        assert!(!session.paused());
    }

    #[test]
    fn rest_countdown_ticks_down_and_finishes_back_to_idle() {
        let mut session = started(ExerciseConfig::hands_raised_hold());
        session.apply_update(&FrameUpdate::metric(10.0));
        assert_eq!(session.countdown_secs(), REST_DEFAULT_SECS);

        for _ in 0..3 {
            session.rest_tick();
        }
        assert_eq!(session.countdown_secs(), 27);

        for _ in 0..26 {
            assert!(matches!(session.rest_tick(), RestTick::Ticking { .. }));
        }
        assert_eq!(session.rest_tick(), RestTick::Finished);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.countdown_secs(), REST_DEFAULT_SECS);
    }

    #[test]
    fn rest_adjustments_clamp_at_zero_and_have_no_ceiling() {
        let mut session = started(ExerciseConfig::fist_open_close());
        session.apply_update(&FrameUpdate::metric(15.0));

        session.adjust_rest(REST_ADJUST_STEP_SECS);
        assert_eq!(session.countdown_secs(), 35);
        session.adjust_rest(REST_ADJUST_STEP_SECS);
        assert_eq!(session.countdown_secs(), 40);

        session.adjust_rest(-37);
        assert_eq!(session.countdown_secs(), 3);
        session.adjust_rest(-REST_ADJUST_STEP_SECS);
        assert_eq!(session.countdown_secs(), 0);
        assert!(session.resting(), "adjustment alone never ends the rest");

        // The next tick ends the rest period deterministically.
        assert_eq!(session.rest_tick(), RestTick::Finished);
        assert_eq!(session.countdown_secs(), REST_DEFAULT_SECS);
    }

    #[test]
    fn rest_tick_outside_rest_is_inactive() {
        let mut session = started(ExerciseConfig::fist_open_close());
        assert_eq!(session.rest_tick(), RestTick::Inactive);
    }

    #[test]
    fn retry_while_resting_resets_everything_and_reannounces() {
        let mut session = started(ExerciseConfig::fist_open_close());
        session.apply_update(&FrameUpdate {
            frame: Some("abc".into()),
            metric: Some(15.0),
            accuracy: Some(92.0),
        });
        session.rest_tick();
        session.adjust_rest(10);
        assert_eq!(session.phase(), SessionPhase::Resting);

        let effects = session.start(fixed_now());
        assert_eq!(session.metric(), 0.0);
        assert_eq!(session.accuracy(), 0.0);
        assert!(!session.completed());
        assert!(!session.resting());
        assert_eq!(session.countdown_secs(), REST_DEFAULT_SECS);
        assert!(session.video_frame().is_none());
        assert_eq!(session.phase(), SessionPhase::Streaming);
        assert_eq!(
            spoken(&effects),
            vec![session.config().prompts().start.as_str()]
        );
    }

    #[test]
    fn leave_always_sends_the_stop_command() {
        let mut session = started(ExerciseConfig::wrist_rotation());
        let effects = session.leave();
        assert_eq!(
            effects,
            vec![Effect::Command(BackendCommand::Stop(
                ExerciseMode::WristRotation
            ))]
        );
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn frame_and_accuracy_guards_ignore_missing_fields() {
        let mut session = started(ExerciseConfig::fist_open_close());
        session.apply_update(&FrameUpdate {
            frame: Some("frame-1".into()),
            metric: Some(2.0),
            accuracy: Some(75.0),
        });

        // Accuracy missing: previous value sticks.
        session.apply_update(&FrameUpdate {
            frame: Some("frame-2".into()),
            metric: Some(3.0),
            accuracy: None,
        });
        assert_eq!(session.accuracy(), 75.0);
        assert_eq!(session.video_frame(), Some("frame-2"));

        // Out-of-range accuracy is clamped into [0, 100].
        session.apply_update(&FrameUpdate {
            frame: None,
            metric: None,
            accuracy: Some(140.0),
        });
        assert_eq!(session.accuracy(), 100.0);
        assert_eq!(session.metric(), 3.0);
    }

    #[test]
    fn progress_percent_is_capped() {
        let mut session = started(ExerciseConfig::wrist_rotation());
        session.apply_update(&FrameUpdate::metric(3.0));
        assert!((session.progress_percent() - 60.0).abs() < f64::EPSILON);

        session.apply_update(&FrameUpdate::metric(5.0));
        assert!((session.progress_percent() - 100.0).abs() < f64::EPSILON);
    }
}
