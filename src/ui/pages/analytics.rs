//! Analytics page component.
//!
//! Renders the fetcher snapshot: range selector, refresh and auto-refresh
//! controls, an error banner with retry, and four tabs.

use dioxus::prelude::*;
use std::str::FromStr;

use crate::analytics::{AnalyticsData, AnalyticsSnapshot, TimeRange};
use crate::ui::components::{Badge, Layout, Meter, StatCard, Tab, TabBar};

/// Client-side JavaScript for the Analytics page.
const ANALYTICS_SCRIPT: &str = r#"
const rangeSelect = document.getElementById('time-range');
if (rangeSelect) rangeSelect.addEventListener('change', async () => {
    await postJson('/api/analytics/range', { range: rangeSelect.value });
    window.location.reload();
});
document.querySelectorAll('[data-action="refresh"]').forEach(btn =>
    btn.addEventListener('click', async () => {
        btn.setAttribute('aria-busy', 'true');
        await postJson('/api/analytics/refresh');
        window.location.reload();
    }));
const auto = document.getElementById('auto-refresh');
if (auto) auto.addEventListener('change', () => postJson('/api/analytics/auto-refresh', { enabled: auto.checked }));
onBusEvent(['AnalyticsUpdated', 'AnalyticsFailed'], () => window.location.reload());
"#;

/// Analytics sub-view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalyticsTab {
    #[default]
    Overview,
    Incidents,
    Responders,
    Hotspots,
}

impl AnalyticsTab {
    pub const ALL: [AnalyticsTab; 4] = [
        AnalyticsTab::Overview,
        AnalyticsTab::Incidents,
        AnalyticsTab::Responders,
        AnalyticsTab::Hotspots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsTab::Overview => "overview",
            AnalyticsTab::Incidents => "incidents",
            AnalyticsTab::Responders => "responders",
            AnalyticsTab::Hotspots => "hotspots",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalyticsTab::Overview => "Overview",
            AnalyticsTab::Incidents => "Incidents",
            AnalyticsTab::Responders => "Responders",
            AnalyticsTab::Hotspots => "Hotspots",
        }
    }
}

impl FromStr for AnalyticsTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalyticsTab::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tab: {s}"))
    }
}

/// "45%" -> 45.0; anything unparseable is 0
fn percent_value(s: &str) -> f64 {
    s.trim().trim_end_matches('%').parse().unwrap_or(0.0)
}

fn minutes(value: f64) -> String {
    format!("{value:.1} min")
}

#[derive(Props, Clone, PartialEq)]
pub struct AnalyticsPageProps {
    pub snapshot: AnalyticsSnapshot,
    pub tab: AnalyticsTab,
    /// Sidebar badge
    pub active_count: usize,
}

#[component]
pub fn AnalyticsPage(props: AnalyticsPageProps) -> Element {
    let snapshot = &props.snapshot;
    let tabs: Vec<Tab> = AnalyticsTab::ALL
        .iter()
        .map(|t| Tab {
            id: t.as_str().to_string(),
            label: t.label().to_string(),
            href: format!("/analytics?tab={}", t.as_str()),
        })
        .collect();
    let updated = snapshot
        .last_updated
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string());

    rsx! {
        Layout {
            title: "Analytics".to_string(),
            nav_active: "analytics".to_string(),
            active_count: props.active_count,
            scripts: Some(ANALYTICS_SCRIPT.to_string()),

            div { class: "toolbar",
                select { id: "time-range", aria_label: "Time range",
                    for range in TimeRange::ALL.iter() {
                        option {
                            value: range.as_str(),
                            selected: *range == snapshot.time_range,
                            "{range.label()}"
                        }
                    }
                }
                button { "data-action": "refresh", aria_busy: snapshot.loading, "Refresh" }
                label {
                    input { r#type: "checkbox", role: "switch", id: "auto-refresh", checked: snapshot.auto_refresh }
                    " Auto-refresh"
                }
                if let Some(updated) = updated {
                    small { "Last updated {updated}" }
                }
            }

            if let Some(error) = snapshot.error.clone() {
                article { class: "error-banner", role: "alert",
                    span { "⚠ {error}" }
                    button { class: "outline", "data-action": "refresh", "Retry" }
                }
            }

            TabBar { tabs, active: props.tab.as_str().to_string() }

            {match snapshot.data.clone() {
                None if snapshot.loading => rsx! { article { aria_busy: "true", "Loading analytics..." } },
                None => rsx! { article { "No analytics data yet." } },
                Some(data) => match props.tab {
                    AnalyticsTab::Overview => rsx! { OverviewTab { data } },
                    AnalyticsTab::Incidents => rsx! { IncidentsTab { data } },
                    AnalyticsTab::Responders => rsx! { RespondersTab { data } },
                    AnalyticsTab::Hotspots => rsx! { HotspotsTab { data } },
                },
            }}
        }
    }
}

#[component]
fn OverviewTab(data: AnalyticsData) -> Element {
    let overview = &data.overview;
    let peak = data.trend_peak().max(1) as f64;

    rsx! {
        section { class: "cards",
            StatCard {
                label: "Total Emergencies".to_string(),
                value: overview.total_emergencies.to_string(),
                note: Some(format!("{} vs previous period", overview.emergency_growth)),
            }
            StatCard { label: "Active".to_string(), value: overview.active_emergencies.to_string() }
            StatCard {
                label: "Resolved".to_string(),
                value: overview.resolved_emergencies.to_string(),
                note: Some(format!("{} resolution rate", overview.resolution_rate)),
            }
            StatCard {
                label: "Users".to_string(),
                value: overview.total_users.to_string(),
                note: Some(format!("{} growth", overview.user_growth)),
            }
            StatCard { label: "Active Responders".to_string(), value: overview.active_responders.to_string() }
            StatCard { label: "Avg Response".to_string(), value: minutes(overview.avg_response_time) }
        }

        section {
            h3 { "Response Times" }
            table {
                tbody {
                    tr { th { "Average" } td { "{minutes(data.response_times.average)}" } }
                    tr { th { "Fastest" } td { "{minutes(data.response_times.fastest)}" } }
                    tr { th { "Slowest" } td { "{minutes(data.response_times.slowest)}" } }
                    tr { th { "Within target" } td { "{data.response_times.within_target}" } }
                }
            }
        }

        section {
            h3 { "Trends" }
            if data.trends.is_empty() {
                p { small { "No trend data for this range." } }
            } else {
                table {
                    thead {
                        tr { th { "Period" } th { "Emergencies" } th { "Resolved" } th {} }
                    }
                    tbody {
                        for point in data.trends.iter() {
                            tr {
                                td { "{point.label}" }
                                td { "{point.emergencies}" }
                                td { "{point.resolved}" }
                                td { style: "width: 40%;",
                                    Meter { percent: point.emergencies as f64 * 100.0 / peak }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn IncidentsTab(data: AnalyticsData) -> Element {
    rsx! {
        section {
            h3 { "Incident Types" }
            if data.incident_types.is_empty() {
                p { small { "No incidents reported for this range." } }
            } else {
                table {
                    thead {
                        tr { th { "Type" } th { "Count" } th { "Share" } th {} }
                    }
                    tbody {
                        for stat in data.incident_types.iter() {
                            tr {
                                td { "{stat.kind}" }
                                td { "{stat.count}" }
                                td { "{stat.percentage}" }
                                td { style: "width: 40%;",
                                    Meter { percent: percent_value(&stat.percentage) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn RespondersTab(data: AnalyticsData) -> Element {
    let responders = &data.responders;

    rsx! {
        section { class: "cards",
            StatCard { label: "Total Responders".to_string(), value: responders.total.to_string() }
            StatCard {
                label: "Available".to_string(),
                value: responders.available.to_string(),
                accent: Some("#16a34a".to_string()),
            }
            StatCard {
                label: "Busy".to_string(),
                value: responders.busy.to_string(),
                accent: Some("#f59e0b".to_string()),
            }
        }

        section {
            h3 { "By Type" }
            table {
                thead { tr { th { "Type" } th { "Count" } th { "Avg Response" } } }
                tbody {
                    for stat in responders.by_type.iter() {
                        tr {
                            td { "{stat.kind}" }
                            td { "{stat.count}" }
                            td { "{minutes(stat.avg_response_time)}" }
                        }
                    }
                }
            }
        }

        section {
            h3 { "Top Performers" }
            if responders.top.is_empty() {
                p { small { "No responder activity in this range." } }
            } else {
                table {
                    thead {
                        tr { th { "Name" } th { "Type" } th { "Responses" } th { "Rating" } th { "Avg Response" } }
                    }
                    tbody {
                        for performer in responders.top.iter() {
                            tr {
                                td { "{performer.name}" }
                                td { "{performer.kind}" }
                                td { "{performer.responses}" }
                                td { {format!("★ {:.1}", performer.rating)} }
                                td { "{minutes(performer.avg_response_time)}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn HotspotsTab(data: AnalyticsData) -> Element {
    let ranked = data.ranked_hotspots();

    rsx! {
        section {
            h3 { "Hotspots" }
            if ranked.is_empty() {
                p { small { "No hotspots identified for this range." } }
            } else {
                table {
                    thead {
                        tr { th { "#" } th { "Area" } th { "Incidents" } th { "Density" } th { "Coordinates" } }
                    }
                    tbody {
                        for (rank, spot) in ranked.iter().enumerate() {
                            tr { style: "border-left: 4px solid {spot.density.color()};",
                                td { "{rank + 1}" }
                                td { "{spot.area}" }
                                td { "{spot.incidents}" }
                                td {
                                    Badge {
                                        label: spot.density.label().to_string(),
                                        color: spot.density.color().to_string(),
                                    }
                                }
                                td { small { {format!("{:.4}, {:.4}", spot.latitude, spot.longitude)} } }
                            }
                        }
                    }
                }
            }
        }
    }
}
