//! Display-ready analytics structures.
//!
//! Every field is always populated; see [`super::normalize`] for how backend
//! payloads are mapped onto these types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Time range
// =============================================================================

/// Window the backend aggregates over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Hours24,
    #[default]
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    Days90,
    #[serde(rename = "1y")]
    Year1,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Hours24,
        TimeRange::Days7,
        TimeRange::Days30,
        TimeRange::Days90,
        TimeRange::Year1,
    ];

    /// Query-string value sent to the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Hours24 => "24h",
            TimeRange::Days7 => "7d",
            TimeRange::Days30 => "30d",
            TimeRange::Days90 => "90d",
            TimeRange::Year1 => "1y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Hours24 => "Last 24 hours",
            TimeRange::Days7 => "Last 7 days",
            TimeRange::Days30 => "Last 30 days",
            TimeRange::Days90 => "Last 90 days",
            TimeRange::Year1 => "Last year",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown time range: {s}"))
    }
}

// =============================================================================
// Hotspot density
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Density {
    /// Lenient parse: anything unrecognized is `Low`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" | "very high" | "very_high" => Density::Critical,
            "high" => Density::High,
            "medium" | "moderate" => Density::Medium,
            _ => Density::Low,
        }
    }

    /// Map marker / swatch color
    pub fn color(&self) -> &'static str {
        match self {
            Density::Critical => "#991b1b",
            Density::High => "#ef4444",
            Density::Medium => "#f59e0b",
            Density::Low => "#22c55e",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Density::Critical => "Critical",
            Density::High => "High",
            Density::Medium => "Medium",
            Density::Low => "Low",
        }
    }
}

// =============================================================================
// Normalized payload
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsData {
    pub overview: Overview,
    pub incident_types: Vec<IncidentTypeStat>,
    pub hotspots: Vec<Hotspot>,
    pub responders: ResponderStats,
    pub response_times: ResponseTimes,
    pub trends: Vec<TrendPoint>,
}

/// Headline counters for the selected range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_emergencies: u64,
    pub active_emergencies: u64,
    pub resolved_emergencies: u64,
    pub total_users: u64,
    pub active_responders: u64,
    /// Minutes
    pub avg_response_time: f64,
    pub resolution_rate: String,
    pub emergency_growth: String,
    pub user_growth: String,
}

impl Default for Overview {
    fn default() -> Self {
        Self {
            total_emergencies: 0,
            active_emergencies: 0,
            resolved_emergencies: 0,
            total_users: 0,
            active_responders: 0,
            avg_response_time: 0.0,
            resolution_rate: super::ZERO_PERCENT.to_string(),
            emergency_growth: super::ZERO_PERCENT.to_string(),
            user_growth: super::ZERO_PERCENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentTypeStat {
    pub kind: String,
    pub count: u64,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub area: String,
    pub incidents: u64,
    pub density: Density,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponderStats {
    pub total: u64,
    pub available: u64,
    pub busy: u64,
    pub by_type: Vec<ResponderTypeStat>,
    pub top: Vec<ResponderPerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponderTypeStat {
    /// police, medical, volunteer, ...
    pub kind: String,
    pub count: u64,
    pub avg_response_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponderPerformance {
    pub name: String,
    pub kind: String,
    pub responses: u64,
    pub rating: f64,
    pub avg_response_time: f64,
}

/// Minutes from report to first responder contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseTimes {
    pub average: f64,
    pub fastest: f64,
    pub slowest: f64,
    pub within_target: String,
}

impl Default for ResponseTimes {
    fn default() -> Self {
        Self {
            average: 0.0,
            fastest: 0.0,
            slowest: 0.0,
            within_target: super::ZERO_PERCENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub emergencies: u64,
    pub resolved: u64,
}

impl AnalyticsData {
    /// Largest trend value, used to scale bar charts
    pub fn trend_peak(&self) -> u64 {
        self.trends
            .iter()
            .map(|t| t.emergencies.max(t.resolved))
            .max()
            .unwrap_or(0)
    }

    /// Hotspots ordered by incident count, busiest first
    pub fn ranked_hotspots(&self) -> Vec<&Hotspot> {
        let mut ranked: Vec<_> = self.hotspots.iter().collect();
        ranked.sort_by(|a, b| b.incidents.cmp(&a.incidents));
        ranked
    }
}
