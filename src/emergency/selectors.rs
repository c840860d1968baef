//! Read-only projections over the emergency list.
//!
//! These are recomputed on every render; nothing here caches across store
//! mutations or across days.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::model::{EmergencyRecord, EmergencyStatus, IncidentType, Priority};

/// Records that still need a responder (`active` or `assigned`)
pub fn active_count(records: &[EmergencyRecord]) -> usize {
    records.iter().filter(|e| e.status.is_open()).count()
}

/// Terminal records created on the same local calendar day as `now`.
///
/// The day boundary is taken in `now`'s time zone.
pub fn completed_on<Tz: TimeZone>(records: &[EmergencyRecord], now: &DateTime<Tz>) -> usize {
    let tz = now.timezone();
    let today = now.date_naive();
    records
        .iter()
        .filter(|e| e.status.is_terminal())
        .filter(|e| e.created_at.with_timezone(&tz).date_naive() == today)
        .count()
}

/// [`completed_on`] evaluated against the local wall clock
pub fn completed_today(records: &[EmergencyRecord]) -> usize {
    completed_on(records, &Local::now())
}

/// Records grouped per status, list order preserved within each group
pub fn group_by_status(
    records: &[EmergencyRecord],
) -> BTreeMap<EmergencyStatus, Vec<&EmergencyRecord>> {
    let mut groups: BTreeMap<EmergencyStatus, Vec<&EmergencyRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.status).or_default().push(record);
    }
    groups
}

/// `None` keeps everything
pub fn filter_by_status(
    records: &[EmergencyRecord],
    status: Option<EmergencyStatus>,
) -> Vec<&EmergencyRecord> {
    records
        .iter()
        .filter(|e| status.map_or(true, |s| e.status == s))
        .collect()
}

pub fn count_by_priority(records: &[EmergencyRecord]) -> BTreeMap<Priority, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.priority).or_insert(0) += 1;
    }
    counts
}

pub fn count_by_type(records: &[EmergencyRecord]) -> BTreeMap<IncidentType, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.kind.clone()).or_insert(0) += 1;
    }
    counts
}

/// Headline numbers shown on the dashboard cards and sidebar badge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub active: usize,
    pub completed_today: usize,
    /// Open incidents with critical priority
    pub critical: usize,
}

pub fn summarize<Tz: TimeZone>(records: &[EmergencyRecord], now: &DateTime<Tz>) -> DashboardSummary {
    DashboardSummary {
        total: records.len(),
        active: active_count(records),
        completed_today: completed_on(records, now),
        critical: records
            .iter()
            .filter(|e| e.status.is_open() && e.priority == Priority::Critical)
            .count(),
    }
}

/// Age of a record relative to `now`, e.g. "5m ago"
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - created_at).num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (60 * 24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn record(id: &str, status: &str, created_at: DateTime<Utc>) -> EmergencyRecord {
        EmergencyRecord::new(
            id,
            "assault",
            serde_json::from_value(serde_json::json!(status)).unwrap(),
            "Saket",
            created_at,
        )
    }

    #[test]
    fn test_active_count_over_mixed_statuses() {
        let now = Utc::now();
        let records = vec![
            record("1", "active", now),
            record("2", "assigned", now),
            record("3", "resolved", now),
            record("4", "completed", now),
        ];
        assert_eq!(active_count(&records), 2);
    }

    #[test]
    fn test_completed_on_uses_calendar_day_of_now() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        // 2024-03-10 09:00 IST
        let now = ist.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();

        let records = vec![
            // 2024-03-10 00:30 IST = 2024-03-09 19:00 UTC: same local day
            record(
                "a",
                "resolved",
                Utc.with_ymd_and_hms(2024, 3, 9, 19, 0, 0).unwrap(),
            ),
            // 2024-03-09 23:00 IST: previous local day
            record(
                "b",
                "completed",
                Utc.with_ymd_and_hms(2024, 3, 9, 17, 30, 0).unwrap(),
            ),
            // Same day but still open
            record(
                "c",
                "active",
                Utc.with_ymd_and_hms(2024, 3, 10, 1, 0, 0).unwrap(),
            ),
            record(
                "d",
                "completed",
                Utc.with_ymd_and_hms(2024, 3, 10, 2, 0, 0).unwrap(),
            ),
        ];

        assert_eq!(completed_on(&records, &now), 2);
    }

    #[test]
    fn test_completed_today_follows_clock() {
        let records = vec![
            record("a", "resolved", Utc::now()),
            record("b", "resolved", Utc::now() - Duration::days(3)),
        ];
        assert_eq!(completed_on(&records, &Utc::now()), 1);
    }

    #[test]
    fn test_group_by_status_preserves_order() {
        let now = Utc::now();
        let records = vec![
            record("1", "active", now),
            record("2", "resolved", now),
            record("3", "active", now),
        ];

        let groups = group_by_status(&records);
        let active: Vec<_> = groups[&EmergencyStatus::Active]
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(active, vec!["1", "3"]);
        assert_eq!(groups[&EmergencyStatus::Resolved].len(), 1);
        assert!(!groups.contains_key(&EmergencyStatus::Assigned));
    }

    #[test]
    fn test_filter_and_counts() {
        let now = Utc::now();
        let records = vec![
            record("1", "active", now).with_priority(Priority::Critical),
            record("2", "assigned", now),
            record("3", "resolved", now).with_priority(Priority::Critical),
        ];

        assert_eq!(filter_by_status(&records, None).len(), 3);
        assert_eq!(
            filter_by_status(&records, Some(EmergencyStatus::Assigned))[0].id,
            "2"
        );
        assert_eq!(count_by_priority(&records)[&Priority::Critical], 2);
        assert_eq!(count_by_type(&records)[&IncidentType::Assault], 3);

        let summary = summarize(&records, &now);
        assert_eq!(
            summary,
            DashboardSummary {
                total: 3,
                active: 2,
                completed_today: 1,
                critical: 1,
            }
        );
    }

    #[test]
    fn test_time_ago() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now, now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::minutes(125), now), "2h ago");
        assert_eq!(time_ago(now - Duration::days(3), now), "3d ago");
    }
}
