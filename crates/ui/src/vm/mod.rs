mod exercise_vm;

pub use exercise_vm::{ExerciseIntent, ExerciseVm};
