//! Reports page component.
//!
//! Four report sub-views selected by tab. Time range and export format are
//! plain GET selectors; print, share and export are browser-side affordances.

use chrono::{DateTime, Utc};
use dioxus::prelude::*;

use crate::analytics::{AnalyticsData, TimeRange};
use crate::reports::{BreakdownRow, ExportFormat, IncidentSummary, ReportKind};
use crate::ui::components::{Badge, Layout, Meter, StatCard, Tab, TabBar};

/// Client-side JavaScript for the Reports page.
const REPORTS_SCRIPT: &str = r#"
document.querySelectorAll('#report-filters select').forEach(el =>
    el.addEventListener('change', () => el.form.submit()));
document.getElementById('print-report').addEventListener('click', () => window.print());
document.getElementById('share-report').addEventListener('click', async () => {
    const data = { title: document.title, url: window.location.href };
    try {
        if (navigator.share) { await navigator.share(data); }
        else { await navigator.clipboard.writeText(data.url); alert('Report link copied'); }
    } catch (e) { console.warn('share cancelled', e); }
});
document.getElementById('export-report').addEventListener('click', (e) => {
    alert('Export as ' + e.target.dataset.format + ' is not available yet.');
});
onBusEvent(['EmergenciesReplaced', 'EmergencyAdded', 'EmergencyUpdated', 'AnalyticsUpdated'],
    () => window.location.reload());
"#;

#[derive(Props, Clone, PartialEq)]
pub struct ReportsPageProps {
    pub kind: ReportKind,
    pub range: TimeRange,
    pub format: ExportFormat,
    pub summary: IncidentSummary,
    /// Latest analytics, if any were fetched
    pub analytics: Option<AnalyticsData>,
    /// Range the analytics figures were fetched for
    pub analytics_range: TimeRange,
    pub generated_at: DateTime<Utc>,
    pub active_count: usize,
}

fn report_href(kind: ReportKind, range: TimeRange, format: ExportFormat) -> String {
    format!(
        "/reports?tab={}&range={}&format={}",
        kind.as_str(),
        range.as_str(),
        format.as_str()
    )
}

#[component]
pub fn ReportsPage(props: ReportsPageProps) -> Element {
    let tabs: Vec<Tab> = ReportKind::ALL
        .iter()
        .map(|k| Tab {
            id: k.as_str().to_string(),
            label: k.label().to_string(),
            href: report_href(*k, props.range, props.format),
        })
        .collect();
    let generated = props
        .generated_at
        .with_timezone(&chrono::Local)
        .format("%d %b %Y %H:%M")
        .to_string();
    let analytics_note = (props.analytics.is_some() && props.analytics_range != props.range).then(|| {
        format!(
            "Backend figures cover {} (change the range on the Analytics page).",
            props.analytics_range.label()
        )
    });

    rsx! {
        Layout {
            title: "Reports".to_string(),
            nav_active: "reports".to_string(),
            active_count: props.active_count,
            scripts: Some(REPORTS_SCRIPT.to_string()),

            form { id: "report-filters", class: "toolbar", method: "get", action: "/reports",
                input { r#type: "hidden", name: "tab", value: props.kind.as_str() }
                select { name: "range", aria_label: "Report period",
                    for range in TimeRange::ALL.iter() {
                        option { value: range.as_str(), selected: *range == props.range, "{range.label()}" }
                    }
                }
                select { name: "format", aria_label: "Export format",
                    for format in ExportFormat::ALL.iter() {
                        option { value: format.as_str(), selected: *format == props.format, "{format.label()}" }
                    }
                }
                button { r#type: "button", id: "export-report", "data-format": props.format.label(), "Export {props.format.label()}" }
                button { r#type: "button", id: "print-report", class: "secondary", "Print" }
                button { r#type: "button", id: "share-report", class: "outline", "Share" }
            }

            TabBar { tabs, active: props.kind.as_str().to_string() }

            hgroup {
                h2 { "{props.kind.label()}" }
                p { "{props.range.label()} · generated {generated}" }
            }
            if let Some(note) = analytics_note {
                p { small { "{note}" } }
            }

            {match props.kind {
                ReportKind::Summary => rsx! {
                    SummaryReport { summary: props.summary.clone(), analytics: props.analytics.clone() }
                },
                ReportKind::Incidents => rsx! { IncidentReport { summary: props.summary.clone() } },
                ReportKind::Responders => rsx! { ResponderReport { analytics: props.analytics.clone() } },
                ReportKind::Hotspots => rsx! { HotspotReport { analytics: props.analytics.clone() } },
            }}
        }
    }
}

#[component]
fn BreakdownTable(title: String, rows: Vec<BreakdownRow>) -> Element {
    rsx! {
        section {
            h3 { "{title}" }
            table {
                thead { tr { th { "Category" } th { "Count" } th { "Share" } th {} } }
                tbody {
                    for row in rows.iter() {
                        tr {
                            td { "{row.label}" }
                            td { "{row.count}" }
                            td { "{row.share}" }
                            td { style: "width: 35%;",
                                Meter { percent: row.share.trim_end_matches('%').parse::<f64>().unwrap_or(0.0) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SummaryReport(summary: IncidentSummary, analytics: Option<AnalyticsData>) -> Element {
    rsx! {
        section { class: "cards",
            StatCard { label: "Incidents".to_string(), value: summary.total.to_string() }
            StatCard { label: "Open".to_string(), value: summary.open.to_string() }
            StatCard { label: "Resolved".to_string(), value: summary.resolved.to_string() }
            StatCard { label: "Resolution Rate".to_string(), value: summary.resolution_rate.clone() }
        }
        if let Some(data) = analytics {
            section { class: "cards",
                StatCard {
                    label: "Platform Emergencies".to_string(),
                    value: data.overview.total_emergencies.to_string(),
                    note: Some(format!("{} growth", data.overview.emergency_growth)),
                }
                StatCard {
                    label: "Avg Response".to_string(),
                    value: format!("{:.1} min", data.response_times.average),
                    note: Some(format!("{} within target", data.response_times.within_target)),
                }
                StatCard { label: "Responders".to_string(), value: data.responders.total.to_string() }
            }
        }
        BreakdownTable { title: "By Status".to_string(), rows: summary.by_status.clone() }
    }
}

#[component]
fn IncidentReport(summary: IncidentSummary) -> Element {
    rsx! {
        if summary.total == 0 {
            article { "No incidents recorded." }
        } else {
            BreakdownTable { title: "By Type".to_string(), rows: summary.by_type.clone() }
            BreakdownTable { title: "By Priority".to_string(), rows: summary.by_priority.clone() }
        }
    }
}

#[component]
fn ResponderReport(analytics: Option<AnalyticsData>) -> Element {
    let Some(data) = analytics else {
        return rsx! { article { "Responder figures are unavailable until analytics load." } };
    };

    rsx! {
        section { class: "cards",
            StatCard { label: "Total".to_string(), value: data.responders.total.to_string() }
            StatCard { label: "Available".to_string(), value: data.responders.available.to_string() }
            StatCard { label: "Busy".to_string(), value: data.responders.busy.to_string() }
        }
        section {
            h3 { "Performance" }
            table {
                thead { tr { th { "Name" } th { "Type" } th { "Responses" } th { "Rating" } th { "Avg Response" } } }
                tbody {
                    for performer in data.responders.top.iter() {
                        tr {
                            td { "{performer.name}" }
                            td { "{performer.kind}" }
                            td { "{performer.responses}" }
                            td { {format!("{:.1}", performer.rating)} }
                            td { {format!("{:.1} min", performer.avg_response_time)} }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn HotspotReport(analytics: Option<AnalyticsData>) -> Element {
    let Some(data) = analytics else {
        return rsx! { article { "Hotspot figures are unavailable until analytics load." } };
    };
    let ranked = data.ranked_hotspots();

    rsx! {
        table {
            thead { tr { th { "#" } th { "Area" } th { "Incidents" } th { "Density" } } }
            tbody {
                for (rank, spot) in ranked.iter().enumerate() {
                    tr {
                        td { "{rank + 1}" }
                        td { "{spot.area}" }
                        td { "{spot.incidents}" }
                        td {
                            Badge {
                                label: spot.density.label().to_string(),
                                color: spot.density.color().to_string(),
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
    use crate::emergency::seed::sample_emergencies;

    fn render(kind: ReportKind, analytics: Option<AnalyticsData>) -> String {
        let summary = IncidentSummary::from_records(&sample_emergencies());
        dioxus::ssr::render_element(rsx! {
            ReportsPage {
                kind,
                range: TimeRange::Days30,
                format: ExportFormat::Csv,
                summary,
                analytics,
                analytics_range: TimeRange::Days7,
                generated_at: Utc::now(),
                active_count: 2,
            }
        })
    }

    #[test]
    fn test_incident_report_lists_types() {
        let html = render(ReportKind::Incidents, None);
        assert!(html.contains("By Type"));
        assert!(html.contains("By Priority"));
        assert!(html.contains("Export CSV"));
    }

    #[test]
    fn test_responder_report_without_analytics() {
        let html = render(ReportKind::Responders, None);
        assert!(html.contains("unavailable until analytics load"));
    }

    #[test]
    fn test_range_mismatch_note() {
        let html = render(ReportKind::Summary, Some(AnalyticsData::default()));
        assert!(html.contains("Backend figures cover Last 7 days"));
        assert!(html.contains("Platform Emergencies"));
    }
}
