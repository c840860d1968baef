//! Emergency store - the canonical in-memory list of emergencies.
//!
//! All mutation goes through [`EmergencyStore::dispatch`], which applies one
//! [`EmergencyAction`] with [`reduce`] while holding the write lock. Readers
//! therefore never observe a partially-applied action.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::model::{EmergencyRecord, EmergencyStatus};
use super::seed::sample_emergencies;
use crate::bus::{BusEvent, SharedBus};

/// Store contents
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmergencyState {
    /// Display order: most recently added first
    pub emergencies: Vec<EmergencyRecord>,
    pub loading: bool,
}

/// Named mutations accepted by the store
#[derive(Debug, Clone, PartialEq)]
pub enum EmergencyAction {
    SetAll(Vec<EmergencyRecord>),
    Add(EmergencyRecord),
    Update(EmergencyRecord),
    SetLoading(bool),
}

/// What an applied action did to the state
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEffect {
    Replaced { count: usize },
    Added { id: String, status: EmergencyStatus },
    Updated { id: String, status: EmergencyStatus },
    /// `Update` named an id that is not in the list; state untouched
    UnknownId { id: String },
    LoadingChanged { loading: bool },
}

/// Apply one action to the state.
///
/// Never fails: records are accepted as-is.
pub fn reduce(state: &mut EmergencyState, action: EmergencyAction) -> ActionEffect {
    match action {
        EmergencyAction::SetAll(records) => {
            let count = records.len();
            state.emergencies = records;
            ActionEffect::Replaced { count }
        }
        EmergencyAction::Add(record) => {
            if state.emergencies.iter().any(|e| e.id == record.id) {
                warn!("Adding emergency with duplicate id {}", record.id);
            }
            let (id, status) = (record.id.clone(), record.status);
            state.emergencies.insert(0, record);
            ActionEffect::Added { id, status }
        }
        EmergencyAction::Update(record) => {
            match state.emergencies.iter_mut().find(|e| e.id == record.id) {
                Some(slot) => {
                    let (id, status) = (record.id.clone(), record.status);
                    *slot = record;
                    ActionEffect::Updated { id, status }
                }
                None => ActionEffect::UnknownId { id: record.id },
            }
        }
        EmergencyAction::SetLoading(loading) => {
            state.loading = loading;
            ActionEffect::LoadingChanged { loading }
        }
    }
}

/// Bus event announcing an applied action
fn event_for(effect: &ActionEffect) -> Option<BusEvent> {
    match effect {
        ActionEffect::Replaced { count } => {
            debug!("Emergency list replaced ({} records)", count);
            Some(BusEvent::EmergenciesReplaced { count: *count })
        }
        ActionEffect::Added { id, status } => {
            debug!("Emergency {} added ({})", id, status);
            Some(BusEvent::EmergencyAdded {
                id: id.clone(),
                status: *status,
            })
        }
        ActionEffect::Updated { id, status } => {
            debug!("Emergency {} updated ({})", id, status);
            Some(BusEvent::EmergencyUpdated {
                id: id.clone(),
                status: *status,
            })
        }
        ActionEffect::UnknownId { id } => {
            debug!("Ignoring update for unknown emergency {}", id);
            None
        }
        ActionEffect::LoadingChanged { loading } => {
            Some(BusEvent::EmergencyLoadingChanged { loading: *loading })
        }
    }
}

/// Shared handle to the emergency state
#[derive(Clone)]
pub struct EmergencyStore {
    state: Arc<RwLock<EmergencyState>>,
    bus: SharedBus,
}

impl EmergencyStore {
    /// Create an empty store
    pub fn new(bus: SharedBus) -> Self {
        Self::from_records(Vec::new(), bus)
    }

    /// Create a store holding the built-in sample incidents
    pub fn with_sample_data(bus: SharedBus) -> Self {
        Self::from_records(sample_emergencies(), bus)
    }

    pub fn from_records(emergencies: Vec<EmergencyRecord>, bus: SharedBus) -> Self {
        Self {
            state: Arc::new(RwLock::new(EmergencyState {
                emergencies,
                loading: false,
            })),
            bus,
        }
    }

    /// Apply an action and publish its effect on the bus
    pub async fn dispatch(&self, action: EmergencyAction) -> ActionEffect {
        let effect = {
            let mut state = self.state.write().await;
            reduce(&mut state, action)
        };

        if let Some(event) = event_for(&effect) {
            self.bus.publish(event);
        }
        effect
    }

    /// Replace the whole list
    pub async fn set_all(&self, records: Vec<EmergencyRecord>) {
        self.dispatch(EmergencyAction::SetAll(records)).await;
    }

    /// Prepend one record
    pub async fn add(&self, record: EmergencyRecord) {
        self.dispatch(EmergencyAction::Add(record)).await;
    }

    /// Replace the record with the same id. Returns false if no record matched.
    pub async fn update(&self, record: EmergencyRecord) -> bool {
        matches!(
            self.dispatch(EmergencyAction::Update(record)).await,
            ActionEffect::Updated { .. }
        )
    }

    pub async fn set_loading(&self, loading: bool) {
        self.dispatch(EmergencyAction::SetLoading(loading)).await;
    }

    /// Consistent copy of the whole state
    pub async fn snapshot(&self) -> EmergencyState {
        self.state.read().await.clone()
    }

    pub async fn emergencies(&self) -> Vec<EmergencyRecord> {
        self.state.read().await.emergencies.clone()
    }

    pub async fn get(&self, id: &str) -> Option<EmergencyRecord> {
        self.state
            .read()
            .await
            .emergencies
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.emergencies.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.emergencies.is_empty()
    }
}
