use std::sync::{Arc, Mutex};

use serde_json::json;

use motionaid_core::model::{BackendCommand, ExerciseConfig};
use motionaid_core::time::fixed_clock;
use motionaid_core::{ExerciseSession, SessionPhase};
use services::channel::{ChannelStatus, EventBus, ExerciseChannel, Subscription};
use services::error::ChannelError;
use services::speech::SpeechNotifier;
use services::{ExerciseService, FeedOutcome};

#[derive(Clone, Default)]
struct FakeChannel {
    bus: EventBus,
    sent: Arc<Mutex<Vec<&'static str>>>,
}

impl FakeChannel {
    fn sent(&self) -> Vec<&'static str> {
        self.sent.lock().unwrap().clone()
    }
}

impl ExerciseChannel for FakeChannel {
    fn subscribe(&self, event: &str) -> Subscription {
        self.bus.subscribe(event)
    }

    fn send(&self, command: BackendCommand) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(command.wire_name());
        Ok(())
    }

    fn status(&self) -> ChannelStatus {
        ChannelStatus::Connected
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SpeechCall {
    Cancel,
    Speak(String),
}

#[derive(Clone, Default)]
struct RecordingSpeech {
    calls: Arc<Mutex<Vec<SpeechCall>>>,
}

impl RecordingSpeech {
    fn calls(&self) -> Vec<SpeechCall> {
        self.calls.lock().unwrap().clone()
    }

    fn spoken(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SpeechCall::Speak(text) => Some(text),
                SpeechCall::Cancel => None,
            })
            .collect()
    }
}

impl SpeechNotifier for RecordingSpeech {
    fn cancel_all(&self) {
        self.calls.lock().unwrap().push(SpeechCall::Cancel);
    }

    fn speak(&self, text: &str, _voice_hint: Option<&str>) {
        self.calls
            .lock()
            .unwrap()
            .push(SpeechCall::Speak(text.to_string()));
    }

    fn available(&self) -> bool {
        true
    }
}

fn harness() -> (ExerciseService, FakeChannel, RecordingSpeech) {
    let channel = FakeChannel::default();
    let speech = RecordingSpeech::default();
    let service = ExerciseService::new(
        fixed_clock(),
        Arc::new(channel.clone()),
        Arc::new(speech.clone()),
    );
    (service, channel, speech)
}

#[test]
fn start_sends_stop_then_start_and_announces() {
    let (service, channel, speech) = harness();
    let mut session = ExerciseSession::new(ExerciseConfig::fist_open_close());

    service.start(&mut session).unwrap();

    assert_eq!(channel.sent(), vec!["stop_openclose", "start_openclose"]);
    assert_eq!(
        speech.calls(),
        vec![
            SpeechCall::Cancel,
            SpeechCall::Speak(session.config().prompts().start.clone()),
        ]
    );
    assert_eq!(session.phase(), SessionPhase::Streaming);
}

#[test]
fn full_rep_session_speaks_each_prompt_once() {
    let (service, _channel, speech) = harness();
    let mut session = ExerciseSession::new(ExerciseConfig::fist_open_close());
    service.start(&mut session).unwrap();

    for count in [0, 3, 7, 8, 15] {
        let payload = json!({"frame": "ZmFrZQ==", "count": count, "accuracy": 85.0});
        service.apply_feed(&mut session, &payload).unwrap();
    }

    let prompts = session.config().prompts().clone();
    assert_eq!(
        speech.spoken(),
        vec![prompts.start, prompts.halfway, prompts.completion]
    );
    assert_eq!(session.phase(), SessionPhase::Resting);
}

#[test]
fn completion_reports_once_then_updates_are_dropped() {
    let (service, _channel, speech) = harness();
    let mut session = ExerciseSession::new(ExerciseConfig::hands_raised_hold());
    service.start(&mut session).unwrap();

    let outcome = service
        .apply_feed(&mut session, &json!({"hold_time": 10.3}))
        .unwrap();
    assert_eq!(
        outcome,
        FeedOutcome::Applied {
            completed_now: true
        }
    );

    let spoken_before = speech.spoken().len();
    let outcome = service
        .apply_feed(&mut session, &json!({"hold_time": 11.0}))
        .unwrap();
    assert_eq!(outcome, FeedOutcome::Dropped);
    assert_eq!(speech.spoken().len(), spoken_before);
}

#[test]
fn every_prompt_is_preceded_by_a_cancel() {
    let (service, _channel, speech) = harness();
    let mut session = ExerciseSession::new(ExerciseConfig::fist_open_close());
    service.start(&mut session).unwrap();
    service
        .apply_feed(&mut session, &json!({"count": 15}))
        .unwrap();

    let calls = speech.calls();
    for (index, call) in calls.iter().enumerate() {
        if matches!(call, SpeechCall::Speak(_)) {
            assert!(index > 0, "a prompt must never be the first speech call");
            assert_eq!(calls[index - 1], SpeechCall::Cancel);
        }
    }
}

#[test]
fn unusable_payloads_are_ignored() {
    let (service, _channel, _speech) = harness();
    let mut session = ExerciseSession::new(ExerciseConfig::wrist_rotation());
    service.start(&mut session).unwrap();

    let outcome = service
        .apply_feed(&mut session, &json!({"bogus": true}))
        .unwrap();
    assert_eq!(outcome, FeedOutcome::Ignored);
    assert_eq!(session.metric(), 0.0);

    // The rotation feed names its frame field differently; a valid payload
    // right after still applies.
    let outcome = service
        .apply_feed(&mut session, &json!({"image": "aW1n", "count": 1}))
        .unwrap();
    assert_eq!(
        outcome,
        FeedOutcome::Applied {
            completed_now: false
        }
    );
    assert_eq!(session.video_frame(), Some("aW1n"));
}

#[test]
fn stop_on_leave_always_sends_the_stop_command() {
    let (service, channel, _speech) = harness();
    let mut session = ExerciseSession::new(ExerciseConfig::hands_raised_hold());
    service.start(&mut session).unwrap();
    service.stop(&mut session).unwrap();

    assert_eq!(
        channel.sent(),
        vec!["stop_joinhands", "start_joinhands", "stop_joinhands"]
    );
}

#[test]
fn retry_resets_and_reissues_the_command_pair() {
    let (service, channel, speech) = harness();
    let mut session = ExerciseSession::new(ExerciseConfig::fist_open_close());
    service.start(&mut session).unwrap();
    service
        .apply_feed(&mut session, &json!({"count": 15, "accuracy": 91.0}))
        .unwrap();
    assert_eq!(session.phase(), SessionPhase::Resting);

    service.start(&mut session).unwrap();

    assert_eq!(
        channel.sent(),
        vec![
            "stop_openclose",
            "start_openclose",
            "stop_openclose",
            "start_openclose",
        ]
    );
    assert_eq!(session.metric(), 0.0);
    assert_eq!(session.accuracy(), 0.0);
    assert_eq!(session.phase(), SessionPhase::Streaming);

    // The start prompt is re-announced on retry.
    let start = session.config().prompts().start.clone();
    let starts = speech
        .spoken()
        .into_iter()
        .filter(|text| *text == start)
        .count();
    assert_eq!(starts, 2);
}
