//! Sidebar navigation with the active-incident badge.

use dioxus::prelude::*;

/// Navigation links for the main menu: (id, icon, label, href)
const NAV_LINKS: &[(&str, &str, &str, &str)] = &[
    ("dashboard", "🚨", "Dashboard", "/"),
    ("analytics", "📊", "Analytics", "/analytics"),
    ("reports", "📄", "Reports", "/reports"),
];

#[derive(Props, Clone, PartialEq)]
pub struct SidebarProps {
    /// The currently active page ID (e.g., "dashboard", "reports")
    pub active: String,
    /// Open incidents; badge hidden at zero
    pub active_count: usize,
}

#[component]
pub fn Sidebar(props: SidebarProps) -> Element {
    rsx! {
        aside { class: "sidebar",
            nav {
                ul {
                    li {
                        button {
                            id: "sidebar-toggle",
                            class: "outline secondary",
                            aria_label: "Toggle sidebar",
                            "☰"
                        }
                    }
                    li {
                        strong { "🛡 " span { class: "brand-name", "Aegis Admin" } }
                    }
                }
                ul {
                    for (id, icon, label, href) in NAV_LINKS.iter() {
                        li {
                            a {
                                href: *href,
                                "aria-current": if *id == props.active.as_str() { "page" } else { "false" },
                                span { "{icon}" }
                                span { class: "label", "{label}" }
                                if *id == "dashboard" {
                                    span {
                                        id: "active-badge",
                                        class: "badge count",
                                        hidden: props.active_count == 0,
                                        "{props.active_count}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
