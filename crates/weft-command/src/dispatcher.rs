//! Event dispatcher collaborator

use std::sync::Mutex;
use weft_types::EngineEvent;

/// Downstream consumer of engine lifecycle events.
///
/// Dispatch is fire-and-forget: the engine never inspects a result.
/// Callers check `enabled` once before building any payload.
pub trait EventDispatcher: Send + Sync {
    fn enabled(&self) -> bool;

    fn dispatch(&self, event: &EngineEvent);
}

/// Dispatcher that reports disabled and drops everything
#[derive(Debug, Default)]
pub struct NullDispatcher;

impl EventDispatcher for NullDispatcher {
    fn enabled(&self) -> bool {
        false
    }

    fn dispatch(&self, _event: &EngineEvent) {}
}

/// Dispatcher that records events in order; used by tests and demos
#[derive(Debug, Default)]
pub struct CollectingDispatcher {
    enabled: bool,
    events: Mutex<Vec<EngineEvent>>,
}

impl CollectingDispatcher {
    pub fn new() -> Self {
        Self {
            enabled: true,
            events: Mutex::new(Vec::new()),
        }
    }

    /// A collecting dispatcher that reports disabled; anything dispatched
    /// anyway is still recorded, so tests can assert gating.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl EventDispatcher for CollectingDispatcher {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn dispatch(&self, event: &EngineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
