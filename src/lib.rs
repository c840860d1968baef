//! Aegis Console - Rust Implementation
//!
//! Administrative console for the Aegis emergency-response platform.
//!
//! This library provides:
//! - In-memory emergency store with a single reducer
//! - Derived dashboard selectors (active count, resolved today, grouping)
//! - Remote analytics fetcher with request sequencing and auto-refresh
//! - Report projections
//! - Server-Sent Events for real-time updates
//! - Server-rendered admin pages (Dioxus SSR, Pico CSS)

pub mod analytics;
pub mod api;
pub mod bus;
pub mod config;
pub mod emergency;
pub mod reports;
pub mod ui;
