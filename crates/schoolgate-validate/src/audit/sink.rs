//! Security event sink trait and the simple sinks.

use super::event::SecurityEvent;
use std::sync::Arc;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Errors a sink may report. The logger swallows them.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Failed to write the event.
    #[error("Failed to write security event: {0}")]
    WriteError(String),

    /// Bounded storage is full.
    #[error("Security event storage is full")]
    StorageFull,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
}

/// Destination for security events.
///
/// Writes are fire-and-forget: callers never read events back through this
/// trait and ordering between concurrent writers is not guaranteed.
pub trait SecurityEventSink: Send + Sync {
    /// Record one event.
    fn write(&self, event: &SecurityEvent) -> SinkResult<()>;
}

impl<S: SecurityEventSink + ?Sized> SecurityEventSink for Arc<S> {
    fn write(&self, event: &SecurityEvent) -> SinkResult<()> {
        (**self).write(event)
    }
}

/// Emits events as `tracing` warnings on the `schoolgate::security` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl SecurityEventSink for TracingSink {
    fn write(&self, event: &SecurityEvent) -> SinkResult<()> {
        tracing::warn!(
            target: "schoolgate::security",
            event_id = %event.id,
            kind = %event.kind,
            timestamp = %event.timestamp_iso(),
            subject_id = event.subject_id.as_deref().unwrap_or(""),
            input = %event.truncated_input,
            "suspicious input attempt detected"
        );
        Ok(())
    }
}

/// Writes every event to each inner sink.
///
/// All sinks are attempted; the first error is returned.
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn SecurityEventSink>>,
}

impl FanoutSink {
    /// Create an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    pub fn with(mut self, sink: impl SecurityEventSink + 'static) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Number of inner sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True when there are no inner sinks.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl SecurityEventSink for FanoutSink {
    fn write(&self, event: &SecurityEvent) -> SinkResult<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.write(event) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{InMemorySink, SecurityEventKind};
    use crate::raw::RawInput;

    struct FailingSink;

    impl SecurityEventSink for FailingSink {
        fn write(&self, _event: &SecurityEvent) -> SinkResult<()> {
            Err(SinkError::WriteError("offline".into()))
        }
    }

    #[test]
    fn fanout_attempts_every_sink() {
        let memory = Arc::new(InMemorySink::new());
        let fanout = FanoutSink::new()
            .with(FailingSink)
            .with(Arc::clone(&memory))
            .with(TracingSink);
        assert_eq!(fanout.len(), 3);

        let event = SecurityEvent::new(SecurityEventKind::SqlInjectionAttempt, &RawInput::from("'--"));
        let result = fanout.write(&event);

        assert!(matches!(result, Err(SinkError::WriteError(_))));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn tracing_sink_never_fails() {
        let event = SecurityEvent::new(SecurityEventKind::FailedLoginAttempt, &RawInput::Missing);
        assert!(TracingSink.write(&event).is_ok());
    }
}
