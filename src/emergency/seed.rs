//! Sample incidents loaded at startup.

use chrono::{DateTime, Duration, Utc};

use super::model::{EmergencyRecord, EmergencyStatus, IncidentType, Priority};

/// (id, type, status, location, minutes ago, priority)
const SAMPLES: &[(&str, &str, EmergencyStatus, &str, i64, Priority)] = &[
    (
        "EMG-2024-0012",
        "harassment",
        EmergencyStatus::Active,
        "Connaught Place, New Delhi",
        4,
        Priority::Critical,
    ),
    (
        "EMG-2024-0011",
        "robbery",
        EmergencyStatus::Assigned,
        "Sector 18 Market, Noida",
        17,
        Priority::High,
    ),
    (
        "EMG-2024-0010",
        "stalking",
        EmergencyStatus::Active,
        "Rajiv Chowk Metro Station",
        32,
        Priority::High,
    ),
    (
        "EMG-2024-0009",
        "assault",
        EmergencyStatus::Resolved,
        "Hauz Khas Village",
        95,
        Priority::Critical,
    ),
    (
        "EMG-2024-0008",
        "domestic",
        EmergencyStatus::Assigned,
        "Lajpat Nagar II",
        140,
        Priority::Medium,
    ),
    (
        "EMG-2024-0007",
        "cyber",
        EmergencyStatus::Resolved,
        "Cyber City, Gurugram",
        310,
        Priority::Low,
    ),
];

/// Sample incidents with timestamps relative to `now`, newest first
pub fn sample_emergencies_at(now: DateTime<Utc>) -> Vec<EmergencyRecord> {
    SAMPLES
        .iter()
        .map(|(id, kind, status, location, minutes_ago, priority)| {
            EmergencyRecord::new(
                *id,
                IncidentType::from(*kind),
                *status,
                *location,
                now - Duration::minutes(*minutes_ago),
            )
            .with_priority(*priority)
        })
        .collect()
}

pub fn sample_emergencies() -> Vec<EmergencyRecord> {
    sample_emergencies_at(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_ids_unique_and_newest_first() {
        let samples = sample_emergencies();
        let ids: HashSet<_> = samples.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), samples.len());
        assert!(samples
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }
}
