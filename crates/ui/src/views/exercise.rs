use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::Link;

use motionaid_core::model::ExerciseMode;
use motionaid_core::SessionPhase;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;
use crate::views::components::StatCard;
use crate::vm::{ExerciseIntent, ExerciseVm};

/// Pages left and right of a mode, in the fixed exercise order.
fn neighbors(mode: ExerciseMode) -> (Option<ExerciseMode>, Option<ExerciseMode>) {
    match mode {
        ExerciseMode::FistOpenClose => (None, Some(ExerciseMode::WristRotation)),
        ExerciseMode::WristRotation => (
            Some(ExerciseMode::FistOpenClose),
            Some(ExerciseMode::HandsRaisedHold),
        ),
        ExerciseMode::HandsRaisedHold => (Some(ExerciseMode::WristRotation), None),
    }
}

/// One page component serves all three exercises; everything that differs
/// between them lives in the mode's built-in configuration.
#[component]
pub fn ExerciseView(mode: ExerciseMode) -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.exercise_service();
    let channel = ctx.channel();

    let vm = use_signal(|| ExerciseVm::new(mode));
    let error = use_signal(|| None::<ViewError>);

    // Feed pump: one subscription per page mount. Dropping the future at
    // unmount drops the subscription, which unsubscribes from the bus.
    let feed_service = service.clone();
    use_future(move || {
        let service = feed_service.clone();
        let channel = channel.clone();
        let mut vm = vm;
        let mut error = error;
        async move {
            let mut feed = channel.subscribe(mode.feed_event());
            while let Some(payload) = feed.next().await {
                if let Err(err) = vm.write().apply_feed(&service, &payload) {
                    error.set(Some(err));
                }
            }
        }
    });

    // Rest timer: a plain one-second heartbeat. Ticks outside a rest period
    // are inactive, so this can run for the whole mount.
    use_future(move || {
        let mut vm = vm;
        async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                vm.write().rest_tick();
            }
        }
    });

    // Navigating away must always stop this mode on the backend.
    let drop_service = service.clone();
    use_drop(move || {
        let mut vm = vm;
        vm.write().stop(&drop_service);
    });

    let dispatch = {
        let service = service.clone();
        use_callback(move |intent: ExerciseIntent| {
            let mut vm = vm;
            let mut error = error;
            match vm.write().dispatch(&service, intent) {
                Ok(()) => error.set(None),
                Err(err) => error.set(Some(err)),
            }
        })
    };

    let vm_guard = vm.read();
    let phase = vm_guard.phase();
    let title = vm_guard.title();
    let metric_name = vm_guard.metric_name();
    let metric_label = vm_guard.metric_label();
    let accuracy_label = vm_guard.accuracy_label();
    let rest_label = vm_guard.rest_label();
    let progress = vm_guard.progress_percent();
    let frame_src = vm_guard.frame_src();
    let start_label = vm_guard.start_label();
    let pause_label = vm_guard.pause_label();
    let tips = vm_guard.tips().to_vec();
    drop(vm_guard);

    let (prev, next) = neighbors(mode);
    let prev_link = prev.map(|m| (Route::for_mode(m), format!("< {}", m.title())));
    let next_link = next.map(|m| (Route::for_mode(m), format!("{} >", m.title())));
    let current_error = *error.read();

    rsx! {
        div { class: "page exercise-page",
            header { class: "exercise-header",
                h2 { "{title}" }
            }
            if let Some(err) = current_error {
                div { class: "banner banner--error", "{err.message()}" }
            }
            div { class: "exercise-grid",
                section { class: "video-panel",
                    if let Some(src) = frame_src {
                        img { class: "video-frame", alt: "Live exercise feed", src: "{src}" }
                    } else {
                        div { class: "video-placeholder",
                            p { "Camera feed appears here once the exercise starts." }
                        }
                    }
                }
                aside { class: "exercise-side",
                    div { class: "stats",
                        StatCard { label: metric_name, value: metric_label }
                        StatCard { label: "Accuracy", value: accuracy_label }
                    }
                    div { class: "progress",
                        div {
                            class: "progress__fill",
                            style: "width: {progress}%",
                        }
                    }
                    div { class: "controls",
                        match phase {
                            SessionPhase::Idle => rsx! {
                                button {
                                    class: "btn btn-primary",
                                    onclick: move |_| dispatch.call(ExerciseIntent::Start),
                                    "{start_label}"
                                }
                            },
                            SessionPhase::Streaming | SessionPhase::Paused => rsx! {
                                button {
                                    class: "btn btn-secondary",
                                    onclick: move |_| dispatch.call(ExerciseIntent::TogglePause),
                                    "{pause_label}"
                                }
                            },
                            SessionPhase::Resting => rsx! {
                                div { class: "rest-panel",
                                    p { class: "rest-panel__heading", "Rest" }
                                    p { class: "rest-panel__count", "{rest_label}" }
                                    div { class: "rest-panel__adjust",
                                        button {
                                            class: "btn btn-ghost",
                                            onclick: move |_| dispatch.call(ExerciseIntent::ShortenRest),
                                            "-5s"
                                        }
                                        button {
                                            class: "btn btn-ghost",
                                            onclick: move |_| dispatch.call(ExerciseIntent::ExtendRest),
                                            "+5s"
                                        }
                                    }
                                    button {
                                        class: "btn btn-primary",
                                        onclick: move |_| dispatch.call(ExerciseIntent::Start),
                                        "{start_label}"
                                    }
                                }
                            },
                        }
                    }
                    div { class: "tips",
                        h3 { "Tips" }
                        ul {
                            for tip in tips {
                                li { "{tip}" }
                            }
                        }
                    }
                }
            }
            footer { class: "exercise-nav",
                if let Some((route, label)) = prev_link {
                    Link { class: "exercise-nav__link", to: route, "{label}" }
                } else {
                    span {}
                }
                if let Some((route, label)) = next_link {
                    Link { class: "exercise-nav__link", to: route, "{label}" }
                } else {
                    span {}
                }
            }
        }
    }
}
