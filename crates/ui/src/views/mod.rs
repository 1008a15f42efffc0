mod components;
mod exercise;
mod home;
mod speech_check;
mod state;

pub use exercise::ExerciseView;
pub use home::HomeView;
pub use speech_check::SpeechCheckView;
pub use state::ViewError;
