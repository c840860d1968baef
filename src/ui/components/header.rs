//! Page header with the live clock.

use chrono::Local;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct HeaderProps {
    pub title: String,
}

/// Server renders the current time; the shell script ticks it every second.
#[component]
pub fn Header(props: HeaderProps) -> Element {
    let now = Local::now();
    let date = now.format("%A, %d %B %Y").to_string();
    let time = now.format("%H:%M:%S").to_string();

    rsx! {
        header { class: "topbar",
            strong { "{props.title}" }
            div {
                small { "{date} " }
                strong { id: "clock", "{time}" }
            }
        }
    }
}
