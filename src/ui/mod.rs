//! Web UI handlers - server-rendered admin pages.
//!
//! Pages are Dioxus components rendered with SSR from the current store and
//! analytics state. Each page subscribes to `/events` and reloads when the
//! state it shows changes.
//!
//! - components/ - Shared Dioxus components (layout, sidebar, header, widgets)
//! - pages/ - Page components (dashboard, analytics, reports)

pub mod components;
pub mod pages;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
};
use chrono::{Local, Utc};
use dioxus::prelude::*;
use serde::Deserialize;

use crate::api::AppState;
use crate::emergency::selectors::{active_count, filter_by_status, summarize};
use crate::emergency::EmergencyStatus;
use crate::reports::{ExportFormat, IncidentSummary, ReportKind};
use pages::{AnalyticsPage, AnalyticsTab, DashboardPage, ReportsPage};

/// Unknown selector values fall back to the default view
fn parse_or_default<T: std::str::FromStr + Default>(value: Option<&str>) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}

fn render_page(element: Element) -> Html<String> {
    let html = dioxus::ssr::render_element(element);
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"light\">\n{}</html>",
        html
    ))
}

/// Query params for the dashboard
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub status: Option<String>,
}

/// GET / - Dashboard with summary cards and the emergency table
pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let snapshot = state.emergencies.snapshot().await;
    let filter = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<EmergencyStatus>().ok());
    let summary = summarize(&snapshot.emergencies, &Local::now());
    let emergencies = filter_by_status(&snapshot.emergencies, filter)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    let loading = snapshot.loading;
    let now = Utc::now();

    render_page(rsx! {
        DashboardPage { emergencies, summary, filter, loading, now }
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub tab: Option<String>,
}

/// GET /analytics - Analytics view over the fetcher snapshot
pub async fn analytics_page(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> impl IntoResponse {
    let snapshot = state.analytics.snapshot().await;
    let tab: AnalyticsTab = parse_or_default(query.tab.as_deref());
    let active_count = active_count(&state.emergencies.emergencies().await);

    render_page(rsx! {
        AnalyticsPage { snapshot, tab, active_count }
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    pub tab: Option<String>,
    pub range: Option<String>,
    pub format: Option<String>,
}

/// GET /reports - Report sub-views
pub async fn reports_page(
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
) -> impl IntoResponse {
    let records = state.emergencies.emergencies().await;
    let analytics = state.analytics.snapshot().await;

    let kind: ReportKind = parse_or_default(query.tab.as_deref());
    let format: ExportFormat = parse_or_default(query.format.as_deref());
    let range = query
        .range
        .as_deref()
        .and_then(|r| r.parse().ok())
        .unwrap_or(analytics.time_range);
    let summary = IncidentSummary::from_records(&records);
    let active_count = active_count(&records);
    let analytics_range = analytics.time_range;
    let analytics = analytics.data;
    let generated_at = Utc::now();

    render_page(rsx! {
        ReportsPage {
            kind,
            range,
            format,
            summary,
            analytics,
            analytics_range,
            generated_at,
            active_count,
        }
    })
}
