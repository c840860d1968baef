//! Mock Aegis analytics backend
//!
//! Serves `GET /api/analytics?timeRange=..` with a scripted envelope and
//! records the ranges it was asked for.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// What the backend answers with
#[derive(Debug, Clone)]
pub enum MockReply {
    /// `{ success: true, data }`
    Data(Value),
    /// `{ success: false, message }`
    Rejected(String),
    /// Bare HTTP status with a non-JSON body
    Status(u16),
}

struct MockAnalyticsState {
    reply: MockReply,
    delay: Duration,
    requested: Vec<String>,
}

/// Mock analytics backend
pub struct MockAnalyticsBackend {
    addr: SocketAddr,
    state: Arc<RwLock<MockAnalyticsState>>,
    handle: JoinHandle<()>,
}

impl MockAnalyticsBackend {
    /// Start a mock backend on a random port
    pub async fn start() -> Self {
        let state = Arc::new(RwLock::new(MockAnalyticsState {
            reply: MockReply::Data(sample_payload()),
            delay: Duration::ZERO,
            requested: Vec::new(),
        }));

        let app = Router::new()
            .route("/api/analytics", get(handle_analytics))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// API root to configure the client with
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub async fn set_reply(&self, reply: MockReply) {
        self.state.write().await.reply = reply;
    }

    /// Delay every response by `delay`
    pub async fn set_delay(&self, delay: Duration) {
        self.state.write().await.delay = delay;
    }

    /// `timeRange` values received so far
    pub async fn requested(&self) -> Vec<String> {
        self.state.read().await.requested.clone()
    }

    /// Stop the mock server
    pub async fn stop(self) {
        self.handle.abort();
    }
}

#[derive(Debug, Deserialize)]
struct AnalyticsQuery {
    #[serde(rename = "timeRange")]
    time_range: Option<String>,
}

async fn handle_analytics(
    State(state): State<Arc<RwLock<MockAnalyticsState>>>,
    Query(query): Query<AnalyticsQuery>,
) -> impl IntoResponse {
    let (reply, delay) = {
        let mut state = state.write().await;
        state
            .requested
            .push(query.time_range.unwrap_or_default());
        (state.reply.clone(), state.delay)
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    match reply {
        MockReply::Data(data) => {
            (StatusCode::OK, Json(json!({ "success": true, "data": data }))).into_response()
        }
        MockReply::Rejected(message) => (
            StatusCode::OK,
            Json(json!({ "success": false, "message": message })),
        )
            .into_response(),
        MockReply::Status(code) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "upstream unavailable",
        )
            .into_response(),
    }
}

/// Representative payload in the backend's camelCase shape
pub fn sample_payload() -> Value {
    json!({
        "overview": {
            "totalEmergencies": 128,
            "activeEmergencies": 9,
            "resolvedEmergencies": 119,
            "totalUsers": 2450,
            "activeResponders": 37,
            "avgResponseTime": 6.4,
            "resolutionRate": "93%",
            "emergencyGrowth": "+12%",
            "userGrowth": "+4.5%"
        },
        "incidentTypes": [
            { "type": "harassment", "count": 48, "percentage": "37.5%" },
            { "type": "robbery", "count": 30, "percentage": "23.4%" }
        ],
        "hotspots": [
            { "area": "Karol Bagh", "incidents": 14, "density": "high", "lat": 28.6519, "lng": 77.1909 },
            { "area": "Saket", "incidents": 21, "density": "critical", "lat": 28.5245, "lng": 77.2066 }
        ],
        "responders": {
            "total": 52,
            "available": 37,
            "busy": 15,
            "byType": [ { "type": "police", "count": 30, "avgResponseTime": 5.9 } ],
            "top": [ { "name": "Unit 12", "type": "police", "responses": 41, "rating": 4.8, "avgResponseTime": 4.2 } ]
        },
        "responseTimes": { "average": 6.4, "fastest": 1.8, "slowest": 22.5, "withinTarget": "81%" },
        "trends": [
            { "label": "Mon", "emergencies": 18, "resolved": 16 },
            { "label": "Tue", "emergencies": 22, "resolved": 21 }
        ]
    })
}
