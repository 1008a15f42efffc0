use dioxus::prelude::*;

#[component]
pub fn StatCard(label: &'static str, value: String) -> Element {
    rsx! {
        div { class: "stat-card",
            span { class: "stat-card__label", "{label}" }
            span { class: "stat-card__value", "{value}" }
        }
    }
}
