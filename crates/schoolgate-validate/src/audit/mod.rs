//! Security event logging.
//!
//! Records rejected or suspicious input attempts for monitoring. Events are
//! write-only from the point of view of the validation layer: they are
//! handed to a [`SecurityEventSink`] and never read back.
//!
//! # Example
//!
//! ```rust
//! use schoolgate_validate::audit::{InMemorySink, SecurityEventKind, SecurityLogger};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new());
//! let logger = SecurityLogger::from_arc(sink.clone());
//!
//! logger.log_event(SecurityEventKind::FailedLoginAttempt, "joao.silva", None);
//!
//! assert_eq!(sink.count_of(SecurityEventKind::FailedLoginAttempt), 1);
//! ```

mod event;
mod file_sink;
mod logger;
mod memory_sink;
mod sink;

pub use event::{SecurityEvent, SecurityEventKind, UnknownEventKind, MAX_LOGGED_INPUT_LEN};
pub use file_sink::{JsonLinesSink, JsonLinesSinkConfig};
pub use logger::{global_logger, install_global_logger, log_event, SecurityLogger};
pub use memory_sink::{InMemorySink, InMemorySinkConfig};
pub use sink::{FanoutSink, SecurityEventSink, SinkError, SinkResult, TracingSink};
