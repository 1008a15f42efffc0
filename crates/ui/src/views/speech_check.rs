use dioxus::prelude::*;

use crate::context::AppContext;

/// Diagnostic page for the speech engine: type a phrase, hear it spoken.
#[component]
pub fn SpeechCheckView() -> Element {
    let ctx = use_context::<AppContext>();
    let speech = ctx.speech();
    let available = speech.available();

    let mut text = use_signal(|| String::from("Speech synthesis is working."));

    let speak = {
        let speech = ctx.speech();
        use_callback(move |()| {
            let phrase = text.read().clone();
            if phrase.trim().is_empty() {
                return;
            }
            speech.cancel_all();
            speech.speak(&phrase, None);
        })
    };
    let stop = {
        let speech = ctx.speech();
        use_callback(move |()| speech.cancel_all())
    };

    rsx! {
        div { class: "page speech-page",
            header { class: "exercise-header",
                h2 { "Speech Check" }
            }
            if !available {
                div { class: "banner banner--error",
                    "No speech engine was found. Voice prompts will be silent."
                }
            }
            div { class: "speech-form",
                input {
                    class: "speech-form__input",
                    value: "{text}",
                    oninput: move |evt| text.set(evt.value()),
                }
                div { class: "controls",
                    button {
                        class: "btn btn-primary",
                        disabled: !available,
                        onclick: move |_| speak.call(()),
                        "Speak"
                    }
                    button {
                        class: "btn btn-secondary",
                        disabled: !available,
                        onclick: move |_| stop.call(()),
                        "Stop"
                    }
                }
            }
        }
    }
}
