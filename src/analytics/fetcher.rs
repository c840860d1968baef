//! Analytics fetcher: current analytics state plus refresh policy.
//!
//! ## Request sequencing
//!
//! Every fetch takes a request id from a counter that lives inside the state
//! lock. When the response arrives, it is applied only if its id is still the
//! newest one issued; otherwise a later request is in flight (or already
//! applied) and the response is dropped. A slow earlier request can therefore
//! never overwrite a faster later one.
//!
//! The lock is held only to issue an id and to apply a result, never across
//! the network call.
//!
//! ## Auto-refresh
//!
//! While enabled, a background task re-issues the fetch at every interval
//! boundary (the first one a full interval after enabling). Disabling cancels
//! the task's token; the task observes cancellation before any further tick.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::client::AnalyticsSource;
use super::types::{AnalyticsData, TimeRange};
use crate::bus::{BusEvent, SharedBus};

/// Default auto-refresh period
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Serializable copy of the fetcher state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub time_range: TimeRange,
    /// Last successfully fetched data; kept across failures
    pub data: Option<AnalyticsData>,
    /// Message of the most recent failure, cleared by the next success
    pub error: Option<String>,
    pub loading: bool,
    pub auto_refresh: bool,
    pub last_updated: Option<DateTime<Utc>>,
    /// Id of the newest request issued
    pub latest_request: u64,
}

/// What happened to a single fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Applied,
    Failed(String),
    /// A newer request was issued before this one completed
    Superseded,
}

#[derive(Clone)]
pub struct AnalyticsFetcher {
    source: Arc<dyn AnalyticsSource>,
    state: Arc<RwLock<AnalyticsSnapshot>>,
    /// Cancellation token of the running poller, if any
    poller: Arc<Mutex<Option<CancellationToken>>>,
    refresh_interval: Duration,
    bus: SharedBus,
}

impl AnalyticsFetcher {
    pub fn new(
        source: Arc<dyn AnalyticsSource>,
        bus: SharedBus,
        time_range: TimeRange,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            source,
            state: Arc::new(RwLock::new(AnalyticsSnapshot {
                time_range,
                ..Default::default()
            })),
            poller: Arc::new(Mutex::new(None)),
            refresh_interval,
            bus,
        }
    }

    pub async fn snapshot(&self) -> AnalyticsSnapshot {
        self.state.read().await.clone()
    }

    pub async fn time_range(&self) -> TimeRange {
        self.state.read().await.time_range
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Fetch the current time range and apply the result if still current
    pub async fn refresh(&self) -> FetchOutcome {
        let (request_id, range) = {
            let mut state = self.state.write().await;
            state.latest_request += 1;
            state.loading = true;
            (state.latest_request, state.time_range)
        };

        debug!("Analytics request #{} ({})", request_id, range);
        let result = self.source.fetch(range).await;

        let mut state = self.state.write().await;
        if state.latest_request != request_id {
            debug!(
                "Dropping analytics response #{} (newer request #{} issued)",
                request_id, state.latest_request
            );
            return FetchOutcome::Superseded;
        }

        state.loading = false;
        match result {
            Ok(data) => {
                state.data = Some(data);
                state.error = None;
                state.last_updated = Some(Utc::now());
                drop(state);

                self.bus.publish(BusEvent::AnalyticsUpdated {
                    time_range: range,
                    request_id,
                });
                FetchOutcome::Applied
            }
            Err(e) => {
                let message = e.to_string();
                warn!("Analytics fetch #{} failed: {}", request_id, message);
                state.error = Some(message.clone());
                drop(state);

                self.bus.publish(BusEvent::AnalyticsFailed {
                    time_range: range,
                    message: message.clone(),
                });
                FetchOutcome::Failed(message)
            }
        }
    }

    /// Switch range. Fetches only when the range actually changes; returns
    /// `None` otherwise. Re-arms the poller when auto-refresh is on.
    pub async fn set_time_range(&self, range: TimeRange) -> Option<FetchOutcome> {
        let auto_refresh = {
            let mut state = self.state.write().await;
            if state.time_range == range {
                return None;
            }
            info!("Analytics time range {} -> {}", state.time_range, range);
            state.time_range = range;
            state.auto_refresh
        };

        if auto_refresh {
            self.arm_poller().await;
        }
        Some(self.refresh().await)
    }

    /// Enable or disable interval polling
    pub async fn set_auto_refresh(&self, enabled: bool) {
        {
            let mut state = self.state.write().await;
            if state.auto_refresh == enabled {
                return;
            }
            state.auto_refresh = enabled;
        }

        if enabled {
            self.arm_poller().await;
            info!(
                "Analytics auto-refresh enabled (every {:?})",
                self.refresh_interval
            );
        } else {
            self.disarm_poller().await;
            info!("Analytics auto-refresh disabled");
        }
        self.bus.publish(BusEvent::AutoRefreshChanged { enabled });
    }

    /// Stop background polling (used at shutdown)
    pub async fn stop(&self) {
        self.disarm_poller().await;
    }

    /// Replace any running poller with a fresh one
    async fn arm_poller(&self) {
        let mut poller = self.poller.lock().await;
        if let Some(previous) = poller.take() {
            previous.cancel();
        }

        let token = CancellationToken::new();
        let fetcher = self.clone();
        let shutdown = token.clone();
        tokio::spawn(async move { fetcher.run_auto_refresh(shutdown).await });
        *poller = Some(token);
    }

    async fn disarm_poller(&self) {
        if let Some(token) = self.poller.lock().await.take() {
            token.cancel();
        }
    }

    async fn run_auto_refresh(self, shutdown: CancellationToken) {
        let period = self.refresh_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    debug!("Analytics poller stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.refresh().await;
                }
            }
        }
    }
}
