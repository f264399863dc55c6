//! Security event logger and the process-wide instance.

use super::event::{SecurityEvent, SecurityEventKind};
use super::sink::{SecurityEventSink, TracingSink};
use crate::raw::RawInput;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Handle used to record security events.
///
/// Cloning is cheap; all clones share the same sink. Logging never fails
/// from the caller's point of view: sink errors are reported through
/// `tracing` and dropped.
#[derive(Clone)]
pub struct SecurityLogger {
    sink: Arc<dyn SecurityEventSink>,
}

impl SecurityLogger {
    /// Create a logger over `sink`.
    pub fn new(sink: impl SecurityEventSink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Create a logger over a shared sink.
    pub fn from_arc(sink: Arc<dyn SecurityEventSink>) -> Self {
        Self { sink }
    }

    /// Logger that emits `tracing` warnings.
    pub fn tracing() -> Self {
        Self::new(TracingSink)
    }

    /// Record an event. `raw` is truncated; non-text values are replaced
    /// by an empty placeholder.
    pub fn log_event(&self, kind: SecurityEventKind, raw: impl Into<RawInput>, subject: Option<&str>) {
        let raw = raw.into();
        let mut event = SecurityEvent::new(kind, &raw);
        if let Some(subject) = subject {
            event = event.subject(subject);
        }
        self.record(&event);
    }

    /// Record a prepared event.
    pub fn record(&self, event: &SecurityEvent) {
        if let Err(e) = self.sink.write(event) {
            tracing::error!(
                target: "schoolgate::security",
                kind = %event.kind,
                error = %e,
                "failed to record security event"
            );
        }
    }
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for SecurityLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityLogger").finish_non_exhaustive()
    }
}

static GLOBAL_LOGGER: OnceLock<SecurityLogger> = OnceLock::new();

/// Install the process-wide logger.
///
/// Only the first call takes effect; later calls get their logger back.
pub fn install_global_logger(logger: SecurityLogger) -> Result<(), SecurityLogger> {
    GLOBAL_LOGGER.set(logger)
}

/// The process-wide logger. Defaults to [`TracingSink`].
pub fn global_logger() -> &'static SecurityLogger {
    GLOBAL_LOGGER.get_or_init(SecurityLogger::tracing)
}

/// Record an event on the process-wide logger.
pub fn log_event(kind: SecurityEventKind, raw: impl Into<RawInput>, subject: Option<&str>) {
    global_logger().log_event(kind, raw, subject);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{InMemorySink, SinkError, SinkResult};

    #[derive(Debug)]
    struct BrokenSink;

    impl SecurityEventSink for BrokenSink {
        fn write(&self, _event: &SecurityEvent) -> SinkResult<()> {
            Err(SinkError::IoError("disk gone".into()))
        }
    }

    #[test]
    fn logs_through_injected_sink() {
        let sink = Arc::new(InMemorySink::new());
        let logger = SecurityLogger::from_arc(sink.clone());

        logger.log_event(
            SecurityEventKind::InvalidPasswordAttempt,
            "x' or 1=1",
            Some("joao.silva"),
        );

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SecurityEventKind::InvalidPasswordAttempt);
        assert_eq!(events[0].subject_id.as_deref(), Some("joao.silva"));
        assert_eq!(events[0].truncated_input, "x' or 1=1");
    }

    #[test]
    fn odd_inputs_do_not_panic() {
        let sink = Arc::new(InMemorySink::new());
        let logger = SecurityLogger::from_arc(sink.clone());

        logger.log_event(SecurityEventKind::LoginSystemError, RawInput::Missing, None);
        logger.log_event(SecurityEventKind::LoginSystemError, 42_i32, None);
        logger.log_event(SecurityEventKind::LoginSystemError, "x".repeat(5000), None);

        let events = sink.events();
        assert_eq!(events[0].truncated_input, "");
        assert_eq!(events[1].truncated_input, "");
        assert_eq!(events[2].truncated_input.len(), 200);
    }

    #[test]
    fn sink_failures_are_swallowed() {
        let logger = SecurityLogger::new(BrokenSink);
        logger.log_event(SecurityEventKind::SqlInjectionAttempt, "'--", None);
    }

    #[test]
    fn clones_share_the_sink() {
        let sink = Arc::new(InMemorySink::new());
        let logger = SecurityLogger::from_arc(sink.clone());
        let clone = logger.clone();

        logger.log_event(SecurityEventKind::FailedLoginAttempt, "a", None);
        clone.log_event(SecurityEventKind::FailedLoginAttempt, "b", None);

        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn first_use_pins_the_global_logger() {
        log_event(SecurityEventKind::FailedLoginAttempt, "someone", None);

        let pinned = global_logger() as *const SecurityLogger;
        assert!(install_global_logger(SecurityLogger::tracing()).is_err());
        assert_eq!(global_logger() as *const SecurityLogger, pinned);
    }
}
