//! Event bus for inter-component communication
//!
//! Uses tokio::sync::broadcast for pub/sub pattern.
//! Store mutations and analytics outcomes are published here so that
//! open pages (via SSE) can re-render when state changes.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::analytics::TimeRange;
use crate::emergency::EmergencyStatus;

/// Event types that can be published on the bus
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum BusEvent {
    // Emergency store events
    EmergenciesReplaced { count: usize },
    EmergencyAdded { id: String, status: EmergencyStatus },
    EmergencyUpdated { id: String, status: EmergencyStatus },
    EmergencyLoadingChanged { loading: bool },

    // Analytics events
    AnalyticsUpdated { time_range: TimeRange, request_id: u64 },
    AnalyticsFailed { time_range: TimeRange, message: String },
    AutoRefreshChanged { enabled: bool },
}

impl BusEvent {
    /// Short event name, used for SSE `event:` fields and logging
    pub fn event_type(&self) -> &'static str {
        match self {
            BusEvent::EmergenciesReplaced { .. } => "EmergenciesReplaced",
            BusEvent::EmergencyAdded { .. } => "EmergencyAdded",
            BusEvent::EmergencyUpdated { .. } => "EmergencyUpdated",
            BusEvent::EmergencyLoadingChanged { .. } => "EmergencyLoadingChanged",
            BusEvent::AnalyticsUpdated { .. } => "AnalyticsUpdated",
            BusEvent::AnalyticsFailed { .. } => "AnalyticsFailed",
            BusEvent::AutoRefreshChanged { .. } => "AutoRefreshChanged",
        }
    }

    /// Whether the event changes data shown on the dashboard
    pub fn is_emergency_event(&self) -> bool {
        matches!(
            self,
            BusEvent::EmergenciesReplaced { .. }
                | BusEvent::EmergencyAdded { .. }
                | BusEvent::EmergencyUpdated { .. }
                | BusEvent::EmergencyLoadingChanged { .. }
        )
    }

    pub fn is_analytics_event(&self) -> bool {
        matches!(
            self,
            BusEvent::AnalyticsUpdated { .. }
                | BusEvent::AnalyticsFailed { .. }
                | BusEvent::AutoRefreshChanged { .. }
        )
    }
}

/// Event bus handle for publishing and subscribing
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BusEvent>,
}

impl EventBus {
    /// Create a new event bus with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: BusEvent) {
        tracing::trace!("bus event: {}", event.event_type());
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.sender.subscribe()
    }

    /// Get the number of current subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    /// Default capacity (256 events)
    fn default() -> Self {
        Self::new(256)
    }
}

/// Shared event bus wrapped in Arc for thread-safe sharing
pub type SharedBus = Arc<EventBus>;

/// Create a new shared event bus
pub fn create_bus() -> SharedBus {
    Arc::new(EventBus::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pubsub() {
        let bus = create_bus();
        let mut rx = bus.subscribe();

        bus.publish(BusEvent::EmergencyAdded {
            id: "EMG-2024-0100".to_string(),
            status: EmergencyStatus::Active,
        });

        let event = rx.recv().await.unwrap();
        match event {
            BusEvent::EmergencyAdded { id, .. } => {
                assert_eq!(id, "EMG-2024-0100");
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = create_bus();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(BusEvent::AutoRefreshChanged { enabled: true });

        assert!(matches!(
            rx1.recv().await.unwrap(),
            BusEvent::AutoRefreshChanged { enabled: true }
        ));
        assert!(matches!(
            rx2.recv().await.unwrap(),
            BusEvent::AutoRefreshChanged { enabled: true }
        ));
    }

    #[test]
    fn test_bus_event_serialization() {
        let event = BusEvent::AnalyticsFailed {
            time_range: TimeRange::Days30,
            message: "backend down".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "AnalyticsFailed");
        assert_eq!(json["payload"]["time_range"], "30d");
        assert_eq!(json["payload"]["message"], "backend down");
    }

    #[test]
    fn test_event_categories() {
        let added = BusEvent::EmergencyAdded {
            id: "x".into(),
            status: EmergencyStatus::Assigned,
        };
        assert!(added.is_emergency_event());
        assert!(!added.is_analytics_event());

        let updated = BusEvent::AnalyticsUpdated {
            time_range: TimeRange::Days7,
            request_id: 3,
        };
        assert!(updated.is_analytics_event());
        assert_eq!(updated.event_type(), "AnalyticsUpdated");
    }

    #[test]
    fn test_publish_without_subscribers_is_ignored() {
        let bus = create_bus();
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(BusEvent::EmergencyLoadingChanged { loading: true });
    }
}
