//! Nullable event bus: records every broadcast instead of sending it.

use poc_messages::{ConsensusEvent, EventService};
use std::sync::Mutex;

#[derive(Default)]
pub struct NullEventBus {
    events: Mutex<Vec<ConsensusEvent>>,
}

impl NullEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything broadcast so far, oldest first.
    pub fn events(&self) -> Vec<ConsensusEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventService for NullEventBus {
    fn broadcast_and_cache(&self, event: ConsensusEvent) {
        self.events.lock().unwrap().push(event);
    }
}
