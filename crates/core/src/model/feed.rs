/// One decoded feed payload from the tracking backend.
///
/// Every field is optional: the backend omits `accuracy` on some frames, and
/// a payload with nothing usable is dropped before it gets here. Decoding
/// from the wire shape lives in the services crate; the session machine only
/// sees this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameUpdate {
    /// Base64-encoded annotated JPEG frame.
    pub frame: Option<String>,
    /// Progress metric: rep count or hold seconds.
    pub metric: Option<f64>,
    /// Accuracy percentage in [0, 100].
    pub accuracy: Option<f64>,
}

impl FrameUpdate {
    /// A metric-only update, handy in tests.
    #[must_use]
    pub fn metric(value: f64) -> Self {
        Self {
            metric: Some(value),
            ..Self::default()
        }
    }
}
