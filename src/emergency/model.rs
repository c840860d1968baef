//! Emergency record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Status
// =============================================================================

/// Lifecycle status of an emergency.
///
/// `Resolved` is the single terminal state. The legacy spelling `completed`
/// is accepted on input and maps to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyStatus {
    Active,
    Assigned,
    #[serde(alias = "completed")]
    Resolved,
}

impl EmergencyStatus {
    pub const ALL: [EmergencyStatus; 3] = [
        EmergencyStatus::Active,
        EmergencyStatus::Assigned,
        EmergencyStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyStatus::Active => "active",
            EmergencyStatus::Assigned => "assigned",
            EmergencyStatus::Resolved => "resolved",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmergencyStatus::Active => "Active",
            EmergencyStatus::Assigned => "Assigned",
            EmergencyStatus::Resolved => "Resolved",
        }
    }

    /// Still needs attention from a responder
    pub fn is_open(&self) -> bool {
        matches!(self, EmergencyStatus::Active | EmergencyStatus::Assigned)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EmergencyStatus::Resolved)
    }

    /// Badge color for status pills
    pub fn color(&self) -> &'static str {
        match self {
            EmergencyStatus::Active => "#dc2626",
            EmergencyStatus::Assigned => "#d97706",
            EmergencyStatus::Resolved => "#16a34a",
        }
    }
}

impl fmt::Display for EmergencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmergencyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(EmergencyStatus::Active),
            "assigned" => Ok(EmergencyStatus::Assigned),
            "resolved" | "completed" => Ok(EmergencyStatus::Resolved),
            other => Err(format!("unknown emergency status: {other}")),
        }
    }
}

// =============================================================================
// Priority
// =============================================================================

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Priority::Critical => "#b91c1c",
            Priority::High => "#ea580c",
            Priority::Medium => "#ca8a04",
            Priority::Low => "#2563eb",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Incident type
// =============================================================================

/// Incident category. The set is open: unknown strings are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncidentType {
    Harassment,
    Robbery,
    Stalking,
    Assault,
    Domestic,
    Cyber,
    Other(String),
}

impl IncidentType {
    pub fn as_str(&self) -> &str {
        match self {
            IncidentType::Harassment => "harassment",
            IncidentType::Robbery => "robbery",
            IncidentType::Stalking => "stalking",
            IncidentType::Assault => "assault",
            IncidentType::Domestic => "domestic",
            IncidentType::Cyber => "cyber",
            IncidentType::Other(s) => s,
        }
    }

    /// Capitalized name for display
    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for IncidentType {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "harassment" => IncidentType::Harassment,
            "robbery" => IncidentType::Robbery,
            "stalking" => IncidentType::Stalking,
            "assault" => IncidentType::Assault,
            "domestic" => IncidentType::Domestic,
            "cyber" => IncidentType::Cyber,
            _ => IncidentType::Other(s),
        }
    }
}

impl From<&str> for IncidentType {
    fn from(s: &str) -> Self {
        IncidentType::from(s.to_string())
    }
}

impl From<IncidentType> for String {
    fn from(kind: IncidentType) -> Self {
        match kind {
            IncidentType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Record
// =============================================================================

/// One reported incident tracked by the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyRecord {
    /// Unique identifier, e.g. "EMG-2024-0012"
    pub id: String,
    #[serde(rename = "type")]
    pub kind: IncidentType,
    pub status: EmergencyStatus,
    /// Free-text place name
    pub location: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
}

impl EmergencyRecord {
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<IncidentType>,
        status: EmergencyStatus,
        location: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            status,
            location: location.into(),
            created_at,
            priority: Priority::default(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: EmergencyStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_wire_format() {
        let json = r#"{
            "id": "EMG-2024-0012",
            "type": "harassment",
            "status": "active",
            "location": "Connaught Place, Delhi",
            "createdAt": "2024-01-15T10:30:00Z",
            "priority": "high"
        }"#;

        let record: EmergencyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "EMG-2024-0012");
        assert_eq!(record.kind, IncidentType::Harassment);
        assert_eq!(record.status, EmergencyStatus::Active);
        assert_eq!(record.priority, Priority::High);
        assert_eq!(
            record.created_at,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
        );

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["type"], "harassment");
        assert_eq!(back["createdAt"], "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        let json = r#"{
            "id": "EMG-1",
            "type": "robbery",
            "status": "assigned",
            "location": "Market",
            "createdAt": "2024-01-15T10:30:00Z"
        }"#;
        let record: EmergencyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.priority, Priority::Medium);
    }

    #[test]
    fn test_completed_is_resolved() {
        let status: EmergencyStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, EmergencyStatus::Resolved);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"resolved\"");
        assert_eq!(
            "Completed".parse::<EmergencyStatus>().unwrap(),
            EmergencyStatus::Resolved
        );
        assert!("closed".parse::<EmergencyStatus>().is_err());
    }

    #[test]
    fn test_unknown_incident_type_kept_verbatim() {
        let kind: IncidentType = serde_json::from_str("\"medical\"").unwrap();
        assert_eq!(kind, IncidentType::Other("medical".to_string()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"medical\"");
        assert_eq!(kind.label(), "Medical");

        let known: IncidentType = serde_json::from_str("\"Cyber\"").unwrap();
        assert_eq!(known, IncidentType::Cyber);
    }

    #[test]
    fn test_open_statuses() {
        assert!(EmergencyStatus::Active.is_open());
        assert!(EmergencyStatus::Assigned.is_open());
        assert!(!EmergencyStatus::Resolved.is_open());
        assert!(EmergencyStatus::Resolved.is_terminal());
    }
}
