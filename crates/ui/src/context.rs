use std::sync::Arc;

use services::channel::ExerciseChannel;
use services::speech::SpeechNotifier;
use services::ExerciseService;

pub trait UiApp: Send + Sync {
    fn exercise_service(&self) -> ExerciseService;
    fn channel(&self) -> Arc<dyn ExerciseChannel>;
    fn speech(&self) -> Arc<dyn SpeechNotifier>;
}

#[derive(Clone)]
pub struct AppContext {
    exercise_service: ExerciseService,
    channel: Arc<dyn ExerciseChannel>,
    speech: Arc<dyn SpeechNotifier>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            exercise_service: app.exercise_service(),
            channel: app.channel(),
            speech: app.speech(),
        }
    }

    #[must_use]
    pub fn exercise_service(&self) -> ExerciseService {
        self.exercise_service.clone()
    }

    #[must_use]
    pub fn channel(&self) -> Arc<dyn ExerciseChannel> {
        Arc::clone(&self.channel)
    }

    #[must_use]
    pub fn speech(&self) -> Arc<dyn SpeechNotifier> {
        Arc::clone(&self.speech)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
