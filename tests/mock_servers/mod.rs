//! Mock servers for integration testing
//!
//! These mock servers simulate the Aegis backend so the analytics client and
//! fetcher can be exercised over real HTTP.

pub mod analytics;

pub use analytics::MockAnalyticsBackend;
