//! Map a partial backend payload onto [`AnalyticsData`].
//!
//! The backend omits fields freely and is not consistent about number
//! encodings (counts sometimes arrive as strings, percentages sometimes as
//! bare numbers). Everything is read leniently from a `serde_json::Value`:
//! - counts and measures default to `0`
//! - percentages default to `"0%"`
//! - strings default to `""`
//! - lists default to empty
//!
//! Keys are read in the backend's camelCase, with snake_case accepted too.

use serde_json::Value;

use super::types::{
    AnalyticsData, Density, Hotspot, IncidentTypeStat, Overview, ResponderPerformance,
    ResponderStats, ResponderTypeStat, ResponseTimes, TrendPoint,
};
use super::ZERO_PERCENT;

/// Normalize a payload. Never fails.
pub fn normalize(raw: &Value) -> AnalyticsData {
    AnalyticsData {
        overview: overview(field(raw, "overview")),
        incident_types: items(raw, "incidentTypes")
            .iter()
            .map(incident_type)
            .collect(),
        hotspots: items(raw, "hotspots").iter().map(hotspot).collect(),
        responders: responders(field(raw, "responders")),
        response_times: response_times(field(raw, "responseTimes")),
        trends: items(raw, "trends").iter().map(trend).collect(),
    }
}

fn overview(v: &Value) -> Overview {
    Overview {
        total_emergencies: count(v, "totalEmergencies"),
        active_emergencies: count(v, "activeEmergencies"),
        resolved_emergencies: count(v, "resolvedEmergencies"),
        total_users: count(v, "totalUsers"),
        active_responders: count(v, "activeResponders"),
        avg_response_time: measure(v, "avgResponseTime"),
        resolution_rate: percent(v, "resolutionRate"),
        emergency_growth: percent(v, "emergencyGrowth"),
        user_growth: percent(v, "userGrowth"),
    }
}

fn incident_type(v: &Value) -> IncidentTypeStat {
    IncidentTypeStat {
        kind: text(v, "type"),
        count: count(v, "count"),
        percentage: percent(v, "percentage"),
    }
}

fn hotspot(v: &Value) -> Hotspot {
    Hotspot {
        area: text(v, "area"),
        incidents: count(v, "incidents"),
        density: Density::parse(&text(v, "density")),
        latitude: measure(v, "lat"),
        longitude: measure(v, "lng"),
    }
}

fn responders(v: &Value) -> ResponderStats {
    ResponderStats {
        total: count(v, "total"),
        available: count(v, "available"),
        busy: count(v, "busy"),
        by_type: items(v, "byType")
            .iter()
            .map(|t| ResponderTypeStat {
                kind: text(t, "type"),
                count: count(t, "count"),
                avg_response_time: measure(t, "avgResponseTime"),
            })
            .collect(),
        top: items(v, "top")
            .iter()
            .map(|r| ResponderPerformance {
                name: text(r, "name"),
                kind: text(r, "type"),
                responses: count(r, "responses"),
                rating: measure(r, "rating"),
                avg_response_time: measure(r, "avgResponseTime"),
            })
            .collect(),
    }
}

fn response_times(v: &Value) -> ResponseTimes {
    ResponseTimes {
        average: measure(v, "average"),
        fastest: measure(v, "fastest"),
        slowest: measure(v, "slowest"),
        within_target: percent(v, "withinTarget"),
    }
}

fn trend(v: &Value) -> TrendPoint {
    TrendPoint {
        label: text(v, "label"),
        emergencies: count(v, "emergencies"),
        resolved: count(v, "resolved"),
    }
}

// =============================================================================
// Lenient field readers
// =============================================================================

/// camelCase key to snake_case ("totalEmergencies" -> "total_emergencies")
fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn field<'a>(v: &'a Value, key: &str) -> &'a Value {
    match v.get(key) {
        Some(found) if !found.is_null() => found,
        _ => v.get(snake_case(key)).unwrap_or(&Value::Null),
    }
}

fn items<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    field(v, key).as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn text(v: &Value, key: &str) -> String {
    match field(v, key) {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn measure(v: &Value, key: &str) -> f64 {
    let n = match field(v, key) {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn count(v: &Value, key: &str) -> u64 {
    match field(v, key) {
        Value::Number(n) => n
            .as_u64()
            .unwrap_or_else(|| n.as_f64().filter(|f| *f > 0.0).map_or(0, |f| f.round() as u64)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f > 0.0)
            .map_or(0, |f| f.round() as u64),
        _ => 0,
    }
}

fn percent(v: &Value, key: &str) -> String {
    match field(v, key) {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                ZERO_PERCENT.to_string()
            } else if s.ends_with('%') {
                s.to_string()
            } else {
                match s.parse::<f64>() {
                    Ok(n) => format_percent(n),
                    Err(_) => s.to_string(),
                }
            }
        }
        Value::Number(n) => format_percent(n.as_f64().unwrap_or(0.0)),
        _ => ZERO_PERCENT.to_string(),
    }
}

/// Render a percentage value: whole numbers without decimals, otherwise one
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return ZERO_PERCENT.to_string();
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}%", rounded)
    } else {
        format!("{:.1}%", rounded)
    }
}

/// `part` as a share of `total`, formatted; `"0%"` when total is zero
pub fn percent_of(part: u64, total: u64) -> String {
    if total == 0 {
        return ZERO_PERCENT.to_string();
    }
    format_percent(part as f64 * 100.0 / total as f64)
}
