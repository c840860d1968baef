//! Remote analytics: backend client, payload normalization, and the
//! fetcher that owns the Analytics view's state and refresh policy.

pub mod client;
pub mod fetcher;
pub mod normalize;
pub mod types;

/// Default for every percentage-like field
pub const ZERO_PERCENT: &str = "0%";

pub use client::{AnalyticsError, AnalyticsSource, HttpAnalyticsSource};
pub use fetcher::{AnalyticsFetcher, AnalyticsSnapshot, FetchOutcome, DEFAULT_REFRESH_INTERVAL};
pub use normalize::{format_percent, normalize, percent_of};
pub use types::{
    AnalyticsData, Density, Hotspot, IncidentTypeStat, Overview, ResponderPerformance,
    ResponderStats, ResponderTypeStat, ResponseTimes, TimeRange, TrendPoint,
};
