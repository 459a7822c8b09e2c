//! Nullable event observer — records every governance event it is handed.

use agora_governance::GovernanceEvent;
use agora_utils::lock_or_recover;
use std::sync::{Arc, Mutex};

/// Cloneable recorder; hand [`EventRecorder::listener`] to the engine and
/// inspect what arrived with [`EventRecorder::events`].
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<GovernanceEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener(&self) -> Box<dyn Fn(&GovernanceEvent) + Send + Sync> {
        let events = Arc::clone(&self.events);
        Box::new(move |event| lock_or_recover(&events, "recorded events").push(event.clone()))
    }

    pub fn events(&self) -> Vec<GovernanceEvent> {
        lock_or_recover(&self.events, "recorded events").clone()
    }

    /// Names of the recorded events, in order.
    pub fn names(&self) -> Vec<&'static str> {
        lock_or_recover(&self.events, "recorded events")
            .iter()
            .map(GovernanceEvent::name)
            .collect()
    }
}
