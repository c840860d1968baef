//! Dashboard page component.
//!
//! Shows the live incident overview:
//! - Summary cards (total, active, resolved today, critical)
//! - Emergency table with status filter tabs

use chrono::{DateTime, Utc};
use dioxus::prelude::*;

use crate::emergency::selectors::time_ago;
use crate::emergency::{DashboardSummary, EmergencyRecord, EmergencyStatus};
use crate::ui::components::{Badge, Layout, StatCard, Tab, TabBar};

/// Client-side JavaScript for the Dashboard page.
const DASHBOARD_SCRIPT: &str = r#"
onBusEvent(['EmergenciesReplaced', 'EmergencyAdded', 'EmergencyUpdated', 'EmergencyLoadingChanged'],
    () => window.location.reload());
"#;

#[derive(Props, Clone, PartialEq)]
pub struct DashboardPageProps {
    /// Rows to show, already filtered
    pub emergencies: Vec<EmergencyRecord>,
    /// Summary over the whole list
    pub summary: DashboardSummary,
    pub filter: Option<EmergencyStatus>,
    pub loading: bool,
    pub now: DateTime<Utc>,
}

fn filter_tabs(summary: &DashboardSummary) -> Vec<Tab> {
    let mut tabs = vec![Tab {
        id: "all".to_string(),
        label: format!("All ({})", summary.total),
        href: "/".to_string(),
    }];
    tabs.extend(EmergencyStatus::ALL.iter().map(|status| Tab {
        id: status.as_str().to_string(),
        label: status.label().to_string(),
        href: format!("/?status={}", status.as_str()),
    }));
    tabs
}

#[component]
pub fn DashboardPage(props: DashboardPageProps) -> Element {
    let summary = props.summary;
    let active_tab = props
        .filter
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|| "all".to_string());

    rsx! {
        Layout {
            title: "Dashboard".to_string(),
            nav_active: "dashboard".to_string(),
            active_count: summary.active,
            scripts: Some(DASHBOARD_SCRIPT.to_string()),

            section { class: "cards",
                StatCard { label: "Total Emergencies".to_string(), value: summary.total.to_string() }
                StatCard {
                    label: "Active".to_string(),
                    value: summary.active.to_string(),
                    accent: Some(EmergencyStatus::Active.color().to_string()),
                }
                StatCard {
                    label: "Resolved Today".to_string(),
                    value: summary.completed_today.to_string(),
                    accent: Some(EmergencyStatus::Resolved.color().to_string()),
                }
                StatCard {
                    label: "Critical Open".to_string(),
                    value: summary.critical.to_string(),
                    note: Some("Open incidents at critical priority".to_string()),
                }
            }

            section { id: "emergencies",
                hgroup {
                    h2 { "Recent Emergencies" }
                    p { "Most recent first" }
                }
                TabBar { tabs: filter_tabs(&summary), active: active_tab }

                if props.loading {
                    article { aria_busy: "true", "Loading emergencies..." }
                } else if props.emergencies.is_empty() {
                    article { "No emergencies match this filter." }
                } else {
                    table {
                        thead {
                            tr {
                                th { "ID" }
                                th { "Type" }
                                th { "Location" }
                                th { "Priority" }
                                th { "Status" }
                                th { "Reported" }
                            }
                        }
                        tbody {
                            for record in props.emergencies.iter() {
                                tr {
                                    td { code { "{record.id}" } }
                                    td { "{record.kind.label()}" }
                                    td { "{record.location}" }
                                    td {
                                        Badge {
                                            label: record.priority.label().to_string(),
                                            color: record.priority.color().to_string(),
                                        }
                                    }
                                    td {
                                        Badge {
                                            label: record.status.label().to_string(),
                                            color: record.status.color().to_string(),
                                        }
                                    }
                                    td { small { "{time_ago(record.created_at, props.now)}" } }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emergency::selectors::summarize;
    use crate::emergency::seed::sample_emergencies_at;

    #[test]
    fn test_renders_rows_and_cards() {
        let now = Utc::now();
        let records = sample_emergencies_at(now);
        let summary = summarize(&records, &now);

        let html = dioxus::ssr::render_element(rsx! {
            DashboardPage {
                emergencies: records.clone(),
                summary,
                filter: None,
                loading: false,
                now,
            }
        });

        for record in &records {
            assert!(html.contains(&record.id), "missing row {}", record.id);
        }
        assert!(html.contains("Total Emergencies"));
        assert!(html.contains("Recent Emergencies"));
    }

    #[test]
    fn test_empty_filter_message() {
        let now = Utc::now();
        let html = dioxus::ssr::render_element(rsx! {
            DashboardPage {
                emergencies: Vec::new(),
                summary: DashboardSummary::default(),
                filter: Some(EmergencyStatus::Assigned),
                loading: false,
                now,
            }
        });
        assert!(html.contains("No emergencies match this filter."));
    }
}
