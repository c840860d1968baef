//! Small presentational pieces shared by pages.

use dioxus::prelude::*;

/// Headline number card
#[component]
pub fn StatCard(
    label: String,
    value: String,
    #[props(default)] note: Option<String>,
    #[props(default)] accent: Option<String>,
) -> Element {
    let style = accent
        .map(|color| format!("border-top: 3px solid {color};"))
        .unwrap_or_default();

    rsx! {
        article { style: "{style}",
            small { "{label}" }
            div { class: "value", "{value}" }
            if let Some(note) = note {
                small { "{note}" }
            }
        }
    }
}

/// One tab link: (id, label, href)
#[derive(Clone, PartialEq)]
pub struct Tab {
    pub id: String,
    pub label: String,
    pub href: String,
}

/// Link-based tab strip; the selected tab is carried in the URL
#[component]
pub fn TabBar(tabs: Vec<Tab>, active: String) -> Element {
    rsx! {
        nav { class: "tabs",
            for tab in tabs.iter() {
                a {
                    href: "{tab.href}",
                    "aria-current": if tab.id == active { "page" } else { "false" },
                    "{tab.label}"
                }
            }
        }
    }
}

/// Colored pill
#[component]
pub fn Badge(label: String, color: String) -> Element {
    rsx! {
        span { class: "badge", style: "background: {color};", "{label}" }
    }
}

/// Horizontal bar scaled to `percent` (0-100)
#[component]
pub fn Meter(percent: f64, #[props(default)] color: Option<String>) -> Element {
    let width = format!("{:.1}", percent.clamp(0.0, 100.0));
    let background = color
        .map(|c| format!("background: {c};"))
        .unwrap_or_default();

    rsx! {
        div { class: "bar", style: "width: {width}%; {background}" }
    }
}
