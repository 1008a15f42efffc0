use dioxus::prelude::*;
use dioxus_router::Link;

use motionaid_core::model::{ExerciseConfig, ExerciseMode, Target};

use crate::routes::Route;

fn target_label(mode: ExerciseMode) -> String {
    match ExerciseConfig::for_mode(mode).target() {
        Target::Reps(n) => format!("{n} repetitions"),
        Target::HoldSeconds(secs) => format!("{secs:.0} second hold"),
    }
}

#[component]
pub fn HomeView() -> Element {
    let cards = [
        (
            ExerciseMode::FistOpenClose,
            "Open and close your fist in front of the camera.",
        ),
        (
            ExerciseMode::WristRotation,
            "Rotate your wrist slowly through its full range.",
        ),
        (
            ExerciseMode::HandsRaisedHold,
            "Raise both hands above your head and hold the position.",
        ),
    ]
    .map(|(mode, blurb)| (Route::for_mode(mode), mode.title(), target_label(mode), blurb));

    rsx! {
        div { class: "page home-page",
            header { class: "home-hero",
                h2 { "Welcome to MotionAid" }
                p { "Guided rehabilitation exercises with live movement tracking." }
            }
            div { class: "home-cards",
                for (route, title, target, blurb) in cards {
                    div { class: "card",
                        h3 { "{title}" }
                        p { class: "card__target", "{target}" }
                        p { class: "card__blurb", "{blurb}" }
                        Link { class: "btn btn-primary", to: route, "Open" }
                    }
                }
            }
        }
    }
}
