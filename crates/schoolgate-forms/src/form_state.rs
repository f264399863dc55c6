//! Per-field error state for a whole form.

use schoolgate_validate::audit::{global_logger, SecurityLogger};
use schoolgate_validate::{validate_all_with, BatchResult, FieldKind, RawInput, ValidationVerdict, Validators};
use std::collections::BTreeMap;

/// Error state of a form, keyed by field name.
///
/// ```rust
/// use schoolgate_forms::FormState;
/// use schoolgate_validate::FieldKind;
///
/// let mut form = FormState::new();
/// form.validate_field("username", "ab", &FieldKind::Login);
/// assert_eq!(form.error("username"), Some("minimum 3 characters"));
///
/// form.clear_field_error("username");
/// assert!(!form.has_errors());
/// ```
#[derive(Debug, Clone)]
pub struct FormState {
    errors: BTreeMap<String, String>,
    is_validating: bool,
    logger: SecurityLogger,
}

impl Default for FormState {
    fn default() -> Self {
        Self::with_logger(global_logger().clone())
    }
}

impl FormState {
    /// Empty state reporting to the process-wide logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty state reporting to `logger`.
    pub fn with_logger(logger: SecurityLogger) -> Self {
        Self {
            errors: BTreeMap::new(),
            is_validating: false,
            logger,
        }
    }

    /// Validate one field and record or clear its error.
    pub fn validate_field(
        &mut self,
        field: impl Into<String>,
        raw: impl Into<RawInput>,
        kind: &FieldKind,
    ) -> ValidationVerdict {
        let field = field.into();
        let verdict = kind.validate(&raw.into());
        match verdict.error_message() {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
        verdict
    }

    /// Validate a record; the error map is replaced by the batch errors.
    pub fn validate_fields<I, K, V>(&mut self, inputs: I, validators: &Validators) -> BatchResult
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawInput>,
    {
        self.is_validating = true;
        let result = validate_all_with(inputs, validators, &self.logger);
        self.errors = result.errors.clone();
        self.is_validating = false;
        result
    }

    /// Forget the error of one field.
    pub fn clear_field_error(&mut self, field: &str) {
        self.errors.remove(field);
    }

    /// Forget every error.
    pub fn clear_all_errors(&mut self) {
        self.errors.clear();
    }

    /// True when any field has an error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Error of `field`, if any.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// All current errors.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// True while a batch validation is running.
    pub fn is_validating(&self) -> bool {
        self.is_validating
    }
}
