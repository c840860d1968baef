//! Emergency records, the in-memory store, and derived views.

pub mod model;
pub mod seed;
pub mod selectors;
pub mod store;

pub use model::{EmergencyRecord, EmergencyStatus, IncidentType, Priority};
pub use selectors::DashboardSummary;
pub use store::{reduce, ActionEffect, EmergencyAction, EmergencyState, EmergencyStore};
