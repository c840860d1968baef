//! Page components for the Dioxus-based web UI.
//!
//! Each page is a Dioxus component that renders a full page using the Layout component.

pub mod analytics;
pub mod dashboard;
pub mod reports;

pub use analytics::{AnalyticsPage, AnalyticsTab};
pub use dashboard::DashboardPage;
pub use reports::ReportsPage;
