//! Shared UI components for the Dioxus-based web UI.

pub mod header;
pub mod layout;
pub mod sidebar;
pub mod widgets;

pub use header::Header;
pub use layout::Layout;
pub use sidebar::Sidebar;
pub use widgets::{Badge, Meter, StatCard, Tab, TabBar};
