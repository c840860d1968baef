//! Report projections for the Reports view.
//!
//! Reports are views over the store and the latest analytics; nothing is
//! encoded to a file. The export format is only carried as a selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::analytics::percent_of;
use crate::emergency::selectors::{count_by_priority, count_by_type};
use crate::emergency::{EmergencyRecord, EmergencyStatus, Priority};

/// Report sub-view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    Summary,
    Incidents,
    Responders,
    Hotspots,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Summary,
        ReportKind::Incidents,
        ReportKind::Responders,
        ReportKind::Hotspots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Summary => "summary",
            ReportKind::Incidents => "incidents",
            ReportKind::Responders => "responders",
            ReportKind::Hotspots => "hotspots",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Summary => "Summary",
            ReportKind::Incidents => "Incident Report",
            ReportKind::Responders => "Responder Performance",
            ReportKind::Hotspots => "Hotspot Analysis",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown report: {s}"))
    }
}

/// Export format offered in the UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Csv,
    Excel,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Csv, ExportFormat::Excel];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Csv => "CSV",
            ExportFormat::Excel => "Excel",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown export format: {s}"))
    }
}

/// One labelled row of a breakdown table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub label: String,
    pub count: usize,
    pub share: String,
}

/// Store-derived incident report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentSummary {
    pub total: usize,
    pub open: usize,
    pub resolved: usize,
    pub resolution_rate: String,
    pub by_type: Vec<BreakdownRow>,
    pub by_priority: Vec<BreakdownRow>,
    pub by_status: Vec<BreakdownRow>,
}

impl IncidentSummary {
    pub fn from_records(records: &[EmergencyRecord]) -> Self {
        let total = records.len();
        let resolved = records.iter().filter(|e| e.status.is_terminal()).count();
        let share = |count: usize| percent_of(count as u64, total as u64);

        let mut by_type: Vec<BreakdownRow> = count_by_type(records)
            .into_iter()
            .map(|(kind, count)| BreakdownRow {
                label: kind.label(),
                count,
                share: share(count),
            })
            .collect();
        // Largest first; ties keep map order
        by_type.sort_by(|a, b| b.count.cmp(&a.count));

        let priorities = count_by_priority(records);
        let by_priority = Priority::ALL
            .iter()
            .map(|p| {
                let count = priorities.get(p).copied().unwrap_or(0);
                BreakdownRow {
                    label: p.label().to_string(),
                    count,
                    share: share(count),
                }
            })
            .collect();

        let by_status = EmergencyStatus::ALL
            .iter()
            .map(|s| {
                let count = records.iter().filter(|e| e.status == *s).count();
                BreakdownRow {
                    label: s.label().to_string(),
                    count,
                    share: share(count),
                }
            })
            .collect();

        Self {
            total,
            open: total - resolved,
            resolved,
            resolution_rate: share(resolved),
            by_type,
            by_priority,
            by_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str, kind: &str, status: EmergencyStatus, priority: Priority) -> EmergencyRecord {
        EmergencyRecord::new(id, kind, status, "Dwarka", Utc::now()).with_priority(priority)
    }

    #[test]
    fn test_summary_breakdowns() {
        let records = vec![
            record("1", "robbery", EmergencyStatus::Active, Priority::High),
            record("2", "robbery", EmergencyStatus::Resolved, Priority::Low),
            record("3", "cyber", EmergencyStatus::Assigned, Priority::High),
            record("4", "robbery", EmergencyStatus::Resolved, Priority::Medium),
        ];

        let summary = IncidentSummary::from_records(&records);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.open, 2);
        assert_eq!(summary.resolved, 2);
        assert_eq!(summary.resolution_rate, "50%");
        assert_eq!(summary.by_type[0].label, "Robbery");
        assert_eq!(summary.by_type[0].count, 3);
        assert_eq!(summary.by_type[0].share, "75%");
        assert_eq!(summary.by_priority.len(), 4);
        assert_eq!(summary.by_priority[0].label, "Critical");
        assert_eq!(summary.by_priority[0].count, 0);
        assert_eq!(summary.by_priority[1].count, 2);
        assert_eq!(summary.by_status[2].count, 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = IncidentSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.resolution_rate, "0%");
        assert!(summary.by_type.is_empty());
        assert!(summary.by_status.iter().all(|r| r.share == "0%"));
    }

    #[test]
    fn test_parse_selectors() {
        assert_eq!("Hotspots".parse::<ReportKind>().unwrap(), ReportKind::Hotspots);
        assert!("weekly".parse::<ReportKind>().is_err());
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::default(), ExportFormat::Pdf);
    }
}
