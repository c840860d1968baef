//! HTTP API handlers

use crate::analytics::{AnalyticsFetcher, AnalyticsSnapshot, FetchOutcome, TimeRange};
use crate::bus::SharedBus;
use crate::emergency::selectors::{filter_by_status, summarize};
use crate::emergency::{DashboardSummary, EmergencyRecord, EmergencyStatus, EmergencyStore};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use chrono::Local;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::{Duration, Instant};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub emergencies: EmergencyStore,
    pub analytics: AnalyticsFetcher,
    pub bus: SharedBus,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(emergencies: EmergencyStore, analytics: AnalyticsFetcher, bus: SharedBus) -> Self {
        Self {
            emergencies,
            analytics,
            bus,
            started_at: Instant::now(),
        }
    }
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// General status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub git_sha: &'static str,
    pub uptime_secs: u64,
    pub emergencies: usize,
    pub analytics_range: TimeRange,
    pub auto_refresh: bool,
    pub bus_subscribers: usize,
}

/// GET /status - Service health check
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let analytics = state.analytics.snapshot().await;

    Json(StatusResponse {
        service: "aegis-console",
        version: env!("AEGIS_VERSION"),
        git_sha: env!("AEGIS_GIT_SHA"),
        uptime_secs: state.started_at.elapsed().as_secs(),
        emergencies: state.emergencies.len().await,
        analytics_range: analytics.time_range,
        auto_refresh: analytics.auto_refresh,
        bus_subscribers: state.bus.subscriber_count(),
    })
}

// =============================================================================
// Emergency handlers
// =============================================================================

/// Optional status filter for list queries
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilter {
    #[serde(default)]
    pub status: Option<EmergencyStatus>,
}

#[derive(Serialize)]
pub struct EmergencyListResponse {
    pub emergencies: Vec<EmergencyRecord>,
    pub loading: bool,
    pub summary: DashboardSummary,
}

/// GET /api/emergencies - List emergencies, optionally filtered by status
pub async fn list_emergencies_handler(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> Json<EmergencyListResponse> {
    let snapshot = state.emergencies.snapshot().await;
    // Summary always covers the whole list, not the filtered view
    let summary = summarize(&snapshot.emergencies, &Local::now());
    let emergencies = filter_by_status(&snapshot.emergencies, filter.status)
        .into_iter()
        .cloned()
        .collect();

    Json(EmergencyListResponse {
        emergencies,
        loading: snapshot.loading,
        summary,
    })
}

/// POST /api/emergencies - Add a new emergency to the top of the list
pub async fn add_emergency_handler(
    State(state): State<AppState>,
    Json(record): Json<EmergencyRecord>,
) -> impl IntoResponse {
    state.emergencies.add(record).await;
    (StatusCode::CREATED, Json(serde_json::json!({"ok": true})))
}

/// PUT /api/emergencies - Replace the whole list
pub async fn replace_emergencies_handler(
    State(state): State<AppState>,
    Json(records): Json<Vec<EmergencyRecord>>,
) -> impl IntoResponse {
    let count = records.len();
    state.emergencies.set_all(records).await;
    Json(serde_json::json!({"ok": true, "count": count}))
}

/// PUT /api/emergencies/{id} - Replace one emergency by id
///
/// Unknown ids leave the list untouched and report `updated: false`.
pub async fn update_emergency_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(record): Json<EmergencyRecord>,
) -> impl IntoResponse {
    if record.id != id {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Body id {} does not match path id {}", record.id, id),
        );
    }

    let updated = state.emergencies.update(record).await;
    Json(serde_json::json!({"ok": true, "updated": updated})).into_response()
}

#[derive(Deserialize)]
pub struct LoadingRequest {
    pub loading: bool,
}

/// POST /api/emergencies/loading - Set the list loading flag
pub async fn set_loading_handler(
    State(state): State<AppState>,
    Json(req): Json<LoadingRequest>,
) -> impl IntoResponse {
    state.emergencies.set_loading(req.loading).await;
    Json(serde_json::json!({"ok": true}))
}

// =============================================================================
// Analytics handlers
// =============================================================================

/// GET /api/analytics - Current analytics state
pub async fn analytics_handler(State(state): State<AppState>) -> Json<AnalyticsSnapshot> {
    Json(state.analytics.snapshot().await)
}

#[derive(Serialize)]
struct FetchResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// A newer request replaced this one before it completed
    superseded: bool,
}

impl From<FetchOutcome> for FetchResponse {
    fn from(outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Applied => Self {
                ok: true,
                error: None,
                superseded: false,
            },
            FetchOutcome::Failed(message) => Self {
                ok: false,
                error: Some(message),
                superseded: false,
            },
            FetchOutcome::Superseded => Self {
                ok: true,
                error: None,
                superseded: true,
            },
        }
    }
}

/// POST /api/analytics/refresh - Fetch the current range now
pub async fn analytics_refresh_handler(State(state): State<AppState>) -> impl IntoResponse {
    let response = FetchResponse::from(state.analytics.refresh().await);
    let status = if response.ok {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(response))
}

#[derive(Deserialize)]
pub struct RangeRequest {
    #[serde(alias = "timeRange")]
    pub range: TimeRange,
}

/// POST /api/analytics/range - Switch time range (fetches only on change)
pub async fn analytics_range_handler(
    State(state): State<AppState>,
    Json(req): Json<RangeRequest>,
) -> impl IntoResponse {
    match state.analytics.set_time_range(req.range).await {
        Some(outcome) => {
            let response = FetchResponse::from(outcome);
            let status = if response.ok {
                StatusCode::OK
            } else {
                StatusCode::BAD_GATEWAY
            };
            (status, Json(response)).into_response()
        }
        None => Json(serde_json::json!({"ok": true, "unchanged": true})).into_response(),
    }
}

#[derive(Deserialize)]
pub struct AutoRefreshRequest {
    pub enabled: bool,
}

/// POST /api/analytics/auto-refresh - Enable or disable interval polling
pub async fn analytics_auto_refresh_handler(
    State(state): State<AppState>,
    Json(req): Json<AutoRefreshRequest>,
) -> impl IntoResponse {
    state.analytics.set_auto_refresh(req.enabled).await;
    Json(serde_json::json!({
        "ok": true,
        "enabled": req.enabled,
        "interval_secs": state.analytics.refresh_interval().as_secs(),
    }))
}

// =============================================================================
// SSE
// =============================================================================

/// GET /events - Server-sent stream of bus events
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.bus.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().data(json))),
            Err(_) => None,
        },
        Err(_) => None, // Skip lagged messages
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AnalyticsData, AnalyticsError, AnalyticsSource};
    use crate::bus::create_bus;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::{get, post, put};
    use axum::Router;
    use chrono::Utc;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FailingSource;

    #[async_trait]
    impl AnalyticsSource for FailingSource {
        async fn fetch(&self, _range: TimeRange) -> Result<AnalyticsData, AnalyticsError> {
            Err(AnalyticsError::Rejected("X".into()))
        }
    }

    fn app() -> (Router, AppState) {
        let bus = create_bus();
        let store = EmergencyStore::from_records(
            vec![
                EmergencyRecord::new("EMG-1", "robbery", EmergencyStatus::Active, "Rohini", Utc::now()),
                EmergencyRecord::new("EMG-2", "cyber", EmergencyStatus::Resolved, "Noida", Utc::now()),
            ],
            bus.clone(),
        );
        let fetcher = AnalyticsFetcher::new(
            Arc::new(FailingSource),
            bus.clone(),
            TimeRange::default(),
            Duration::from_secs(30),
        );
        let state = AppState::new(store, fetcher, bus);
        let router = Router::new()
            .route("/api/emergencies", get(list_emergencies_handler))
            .route("/api/emergencies", post(add_emergency_handler))
            .route("/api/emergencies/{id}", put(update_emergency_handler))
            .route("/api/analytics/refresh", post(analytics_refresh_handler))
            .with_state(state.clone());
        (router, state)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_with_status_filter() {
        let (router, _) = app();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/emergencies?status=active")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["emergencies"].as_array().unwrap().len(), 1);
        assert_eq!(body["emergencies"][0]["id"], "EMG-1");
        assert_eq!(body["summary"]["total"], 2);
        assert_eq!(body["summary"]["active"], 1);
    }

    #[tokio::test]
    async fn test_add_prepends() {
        let (router, state) = app();

        let response = router
            .oneshot(json_request(
                "POST",
                "/api/emergencies",
                serde_json::json!({
                    "id": "EMG-3",
                    "type": "stalking",
                    "status": "active",
                    "location": "Karol Bagh",
                    "createdAt": "2024-03-01T10:00:00Z"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let list = state.emergencies.emergencies().await;
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].id, "EMG-3");
    }

    #[tokio::test]
    async fn test_update_rejects_mismatched_id() {
        let (router, state) = app();

        let response = router
            .oneshot(json_request(
                "PUT",
                "/api/emergencies/EMG-1",
                serde_json::json!({
                    "id": "EMG-2",
                    "type": "robbery",
                    "status": "assigned",
                    "location": "Rohini",
                    "createdAt": "2024-03-01T10:00:00Z"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            state.emergencies.get("EMG-2").await.unwrap().status,
            EmergencyStatus::Resolved
        );
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let (router, state) = app();

        let response = router
            .oneshot(json_request(
                "PUT",
                "/api/emergencies/EMG-404",
                serde_json::json!({
                    "id": "EMG-404",
                    "type": "robbery",
                    "status": "completed",
                    "location": "Rohini",
                    "createdAt": "2024-03-01T10:00:00Z"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["updated"], false);
        assert_eq!(state.emergencies.len().await, 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_reports_message() {
        let (router, state) = app();

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/analytics/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["error"], "X");
        assert_eq!(state.analytics.snapshot().await.error.as_deref(), Some("X"));
    }
}
