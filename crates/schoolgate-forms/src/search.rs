//! Search box state and the debounced auto-search.

use schoolgate_validate::audit::{global_logger, SecurityEventKind, SecurityLogger};
use schoolgate_validate::{validate_search_term, RawInput, ValidationVerdict};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Quiet period before an auto-search runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

fn check_term(term: &RawInput, logger: &SecurityLogger) -> ValidationVerdict {
    let verdict = validate_search_term(term);
    if verdict.is_disallowed() {
        logger.log_event(SecurityEventKind::SearchSqlInjectionAttempt, term, None);
    }
    verdict
}

/// A search input with its error.
#[derive(Debug, Clone)]
pub struct SearchBox {
    term: String,
    error: Option<String>,
    logger: SecurityLogger,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::with_logger(global_logger().clone())
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(logger: SecurityLogger) -> Self {
        Self {
            term: String::new(),
            error: None,
            logger,
        }
    }

    /// Validate `term` and record its error.
    ///
    /// Disallowed terms are reported as `search_sql_injection_attempt`.
    pub fn validate_search(&mut self, term: impl Into<RawInput>) -> ValidationVerdict {
        let verdict = check_term(&term.into(), &self.logger);
        self.error = verdict.error_message();
        verdict
    }

    /// Replace the term. Typing clears the error.
    pub fn update_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
        self.error = None;
    }

    /// Validate the current term; the sanitized term when it passes.
    pub fn submit(&mut self) -> Option<String> {
        let term = RawInput::from(self.term.as_str());
        let verdict = self.validate_search(term);
        if verdict.is_valid {
            verdict.sanitized_text().map(str::to_string)
        } else {
            None
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Auto-search that validates a term once typing has paused.
///
/// Every [`push`](Self::push) cancels the pending validation. When the quiet
/// period elapses the term is validated and, if valid, its sanitized value
/// is sent on the channel returned by [`new`](Self::new). Must be used from
/// within a tokio runtime.
#[derive(Debug)]
pub struct DebouncedSearch {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    results: mpsc::UnboundedSender<String>,
    logger: SecurityLogger,
}

impl DebouncedSearch {
    /// Debouncer with the given quiet period and the receiver of valid terms.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        Self::with_logger(delay, global_logger().clone())
    }

    pub fn with_logger(
        delay: Duration,
        logger: SecurityLogger,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (results, rx) = mpsc::unbounded_channel();
        let search = Self {
            delay,
            pending: None,
            results,
            logger,
        };
        (search, rx)
    }

    /// Record a keystroke.
    pub fn push(&mut self, text: impl Into<String>) {
        self.cancel();

        let text = RawInput::Text(text.into());
        let delay = self.delay;
        let results = self.results.clone();
        let logger = self.logger.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let verdict = check_term(&text, &logger);
            if verdict.is_valid {
                if let Some(term) = verdict.sanitized_text() {
                    let _ = results.send(term.to_string());
                }
            }
        }));
    }

    /// Drop the pending validation, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}
