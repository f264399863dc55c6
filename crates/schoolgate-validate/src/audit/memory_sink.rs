//! In-memory security event sink

use super::event::{SecurityEvent, SecurityEventKind};
use super::sink::{SecurityEventSink, SinkError, SinkResult};
use std::collections::VecDeque;
use std::sync::RwLock;

/// Configuration for the in-memory sink.
#[derive(Debug, Clone)]
pub struct InMemorySinkConfig {
    /// Maximum number of events to keep.
    pub max_events: usize,
    /// Whether to drop the oldest events when full (ring buffer behavior).
    pub evict_oldest: bool,
}

impl Default for InMemorySinkConfig {
    fn default() -> Self {
        Self {
            max_events: 10_000,
            evict_oldest: true,
        }
    }
}

/// Bounded in-memory sink (for tests, development and local dashboards).
#[derive(Debug)]
pub struct InMemorySink {
    events: RwLock<VecDeque<SecurityEvent>>,
    config: InMemorySinkConfig,
}

impl InMemorySink {
    /// Create a sink with default configuration.
    pub fn new() -> Self {
        Self::with_config(InMemorySinkConfig::default())
    }

    /// Create a sink with custom configuration.
    pub fn with_config(config: InMemorySinkConfig) -> Self {
        Self {
            events: RwLock::new(VecDeque::with_capacity(config.max_events.min(1000))),
            config,
        }
    }

    /// Create a ring buffer holding at most `max_events`.
    pub fn bounded(max_events: usize) -> Self {
        Self::with_config(InMemorySinkConfig {
            max_events,
            evict_oldest: true,
        })
    }

    /// Snapshot of the stored events, oldest first.
    pub fn events(&self) -> Vec<SecurityEvent> {
        self.events
            .read()
            .map(|events| events.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of stored events of `kind`.
    pub fn count_of(&self, kind: SecurityEventKind) -> usize {
        self.events
            .read()
            .map(|events| events.iter().filter(|e| e.kind == kind).count())
            .unwrap_or(0)
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored event.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityEventSink for InMemorySink {
    fn write(&self, event: &SecurityEvent) -> SinkResult<()> {
        let mut events = self
            .events
            .write()
            .map_err(|e| SinkError::WriteError(format!("Failed to acquire lock: {}", e)))?;

        if events.len() >= self.config.max_events {
            if !self.config.evict_oldest || self.config.max_events == 0 {
                return Err(SinkError::StorageFull);
            }
            events.pop_front();
        }

        events.push_back(event.clone());
        Ok(())
    }
}
