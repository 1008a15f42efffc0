//! Decoding inbound feed payloads.
//!
//! Fields are presence-guarded: whatever is missing or of the wrong shape
//! is simply absent from the resulting update. A payload with nothing
//! usable decodes to `None` and is dropped by the caller; malformed input
//! from the backend is never an error here.

use serde_json::Value;

use motionaid_core::model::{ExerciseMode, FrameUpdate};

/// Decodes one feed payload using the mode's field names.
#[must_use]
pub fn decode(mode: ExerciseMode, payload: &Value) -> Option<FrameUpdate> {
    let map = payload.as_object()?;

    let frame = map
        .get(mode.frame_field())
        .and_then(Value::as_str)
        .map(str::to_owned);
    let metric = map.get(mode.metric_field()).and_then(Value::as_f64);
    let accuracy = map.get("accuracy").and_then(Value::as_f64);

    if frame.is_none() && metric.is_none() && accuracy.is_none() {
        return None;
    }
    Some(FrameUpdate {
        frame,
        metric,
        accuracy,
    })
}
