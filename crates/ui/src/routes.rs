use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use motionaid_core::model::ExerciseMode;
use services::channel::ChannelStatus;

use crate::context::AppContext;
use crate::views::{ExerciseView, HomeView, SpeechCheckView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/exzero", FistOpenCloseView)] FistOpenClose {},
        #[route("/exone", WristRotationView)] WristRotation {},
        #[route("/extwo", HandsRaisedHoldView)] HandsRaisedHold {},
        #[route("/speech", SpeechCheckView)] SpeechCheck {},
}

impl Route {
    /// The page serving a given exercise mode.
    #[must_use]
    pub fn for_mode(mode: ExerciseMode) -> Self {
        match mode {
            ExerciseMode::FistOpenClose => Self::FistOpenClose {},
            ExerciseMode::WristRotation => Self::WristRotation {},
            ExerciseMode::HandsRaisedHold => Self::HandsRaisedHold {},
        }
    }
}

#[component]
fn FistOpenCloseView() -> Element {
    rsx! {
        ExerciseView { mode: ExerciseMode::FistOpenClose }
    }
}

#[component]
fn WristRotationView() -> Element {
    rsx! {
        ExerciseView { mode: ExerciseMode::WristRotation }
    }
}

#[component]
fn HandsRaisedHoldView() -> Element {
    rsx! {
        ExerciseView { mode: ExerciseMode::HandsRaisedHold }
    }
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let offline = ctx.channel().status() == ChannelStatus::Disconnected;

    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                if offline {
                    div { class: "banner banner--offline",
                        "Tracking backend is offline. Live video and counters are unavailable."
                    }
                }
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "MotionAid" }
            ul {
                li { Link { to: Route::Home {}, "Home" } }
                li { Link { to: Route::FistOpenClose {}, "Fist Open & Close" } }
                li { Link { to: Route::WristRotation {}, "Wrist Rotation" } }
                li { Link { to: Route::HandsRaisedHold {}, "Hands-Raised Hold" } }
                li { Link { to: Route::SpeechCheck {}, "Speech Check" } }
            }
        }
    }
}
