//! Record-level validation.
//!
//! Applies a field → validator mapping across a whole form record and
//! aggregates the per-field verdicts. Fields rejected as disallowed are
//! reported to the security logger with their raw input.

use crate::audit::{global_logger, SecurityEventKind, SecurityLogger};
use crate::fields::FieldKind;
use crate::raw::RawInput;
use crate::sanitize::sanitize_raw;
use crate::verdict::{ValidationVerdict, VerdictValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Type alias for boxed field validator functions.
type FieldValidatorFn = Box<dyn Fn(&RawInput) -> ValidationVerdict + Send + Sync>;

/// Mapping of field name to validator.
///
/// ```rust
/// use schoolgate_validate::prelude::*;
///
/// let validators = Validators::new()
///     .field("username", validate_login_identifier)
///     .field("password", validate_password)
///     .kind("grade", FieldKind::Numeric(NumericOptions::range(0.0, 10.0)));
///
/// assert_eq!(validators.len(), 3);
/// ```
#[derive(Default)]
pub struct Validators {
    fields: HashMap<String, FieldValidatorFn>,
}

impl Validators {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator function for `field`.
    pub fn field<F>(mut self, field: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&RawInput) -> ValidationVerdict + Send + Sync + 'static,
    {
        self.fields.insert(field.into(), Box::new(validator));
        self
    }

    /// Register the validator of a [`FieldKind`] for `field`.
    pub fn kind(self, field: impl Into<String>, kind: FieldKind) -> Self {
        self.field(field, move |raw| kind.validate(raw))
    }

    /// Whether `field` has a validator.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Run the validator registered for `field`, if any.
    pub fn validate(&self, field: &str, raw: &RawInput) -> Option<ValidationVerdict> {
        self.fields.get(field).map(|validator| validator(raw))
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Debug for Validators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.fields.keys().collect();
        names.sort();
        f.debug_struct("Validators").field("fields", &names).finish()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldKind)> for Validators {
    fn from_iter<T: IntoIterator<Item = (K, FieldKind)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Validators::new(), |validators, (field, kind)| validators.kind(field, kind))
    }
}

/// Aggregate result of validating a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// True when every field passed.
    pub is_valid: bool,
    /// Sanitized value per field.
    pub sanitized: BTreeMap<String, VerdictValue>,
    /// Error message per failing field.
    pub errors: BTreeMap<String, String>,
}

impl Default for BatchResult {
    fn default() -> Self {
        Self {
            is_valid: true,
            sanitized: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }
}

impl BatchResult {
    /// Error message for `field`, if it failed.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Sanitized value for `field`.
    pub fn value(&self, field: &str) -> Option<&VerdictValue> {
        self.sanitized.get(field)
    }

    /// Sanitized text for `field`, if it is textual.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.value(field).and_then(VerdictValue::as_text)
    }

    fn record(&mut self, field: String, verdict: ValidationVerdict) {
        if let Some(message) = verdict.error_message() {
            self.is_valid = false;
            self.errors.insert(field.clone(), message);
        }
        self.sanitized.insert(
            field,
            verdict.sanitized_value.unwrap_or_else(VerdictValue::empty),
        );
    }
}

/// Validate a record, logging suspicious fields on the process-wide logger.
pub fn validate_all<I, K, V>(inputs: I, validators: &Validators) -> BatchResult
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<RawInput>,
{
    validate_all_with(inputs, validators, global_logger())
}

/// Validate a record, logging suspicious fields on `logger`.
///
/// Fields without a registered validator are sanitized and always pass.
pub fn validate_all_with<I, K, V>(
    inputs: I,
    validators: &Validators,
    logger: &SecurityLogger,
) -> BatchResult
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<RawInput>,
{
    let mut result = BatchResult::default();

    for (field, raw) in inputs {
        let field = field.into();
        let raw = raw.into();

        match validators.validate(&field, &raw) {
            Some(verdict) => {
                if verdict.is_disallowed() {
                    tracing::debug!(field = %field, "disallowed input in batch validation");
                    logger.log_event(SecurityEventKind::SqlInjectionAttempt, &raw, None);
                }
                result.record(field, verdict);
            }
            None => {
                result
                    .sanitized
                    .insert(field, VerdictValue::Text(sanitize_raw(&raw)));
            }
        }
    }

    result
}

/// Validate a JSON object record on the process-wide logger.
pub fn validate_json(record: &serde_json::Value, validators: &Validators) -> BatchResult {
    validate_json_with(record, validators, global_logger())
}

/// Validate a JSON object record. Anything other than an object yields an
/// empty, valid result.
pub fn validate_json_with(
    record: &serde_json::Value,
    validators: &Validators,
    logger: &SecurityLogger,
) -> BatchResult {
    match record.as_object() {
        Some(map) => validate_all_with(
            map.iter().map(|(k, v)| (k.as_str(), RawInput::from(v))),
            validators,
            logger,
        ),
        None => BatchResult::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::InMemorySink;
    use crate::fields::{validate_login_identifier, validate_numeric, validate_password};
    use crate::verdict::NumericOptions;
    use serde_json::json;
    use std::sync::Arc;

    fn login_validators() -> Validators {
        Validators::new()
            .field("username", validate_login_identifier)
            .field("password", validate_password)
    }

    fn memory_logger() -> (SecurityLogger, Arc<InMemorySink>) {
        let sink = Arc::new(InMemorySink::new());
        (SecurityLogger::from_arc(sink.clone()), sink)
    }

    #[test]
    fn aggregates_field_errors() {
        let (logger, sink) = memory_logger();
        let result = validate_all_with(
            [("username", "x"), ("password", "123456")],
            &login_validators(),
            &logger,
        );

        assert!(!result.is_valid);
        assert_eq!(result.error("username"), Some("minimum 3 characters"));
        assert_eq!(result.error("password"), None);
        assert_eq!(result.text("password"), Some("123456"));
        assert!(sink.is_empty());
    }

    #[test]
    fn logs_raw_input_once_per_disallowed_field() {
        let (logger, sink) = memory_logger();
        let raw = "'; DROP TABLE users; --";
        let result = validate_all_with(
            [("username", raw), ("password", "123456")],
            &login_validators(),
            &logger,
        );

        assert!(!result.is_valid);
        assert_eq!(result.error("username"), Some("disallowed characters"));
        assert_eq!(result.text("username"), Some(""));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SecurityEventKind::SqlInjectionAttempt);
        assert_eq!(events[0].truncated_input, raw);
    }

    #[test]
    fn unregistered_fields_are_sanitized_and_pass() {
        let (logger, _) = memory_logger();
        let result = validate_all_with(
            [("note", RawInput::from("  hello\tthere  ")), ("count", RawInput::from(3_i32))],
            &Validators::new(),
            &logger,
        );

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.text("note"), Some("hellothere"));
        assert_eq!(result.text("count"), Some(""));
    }

    #[test]
    fn numeric_values_are_kept() {
        let (logger, _) = memory_logger();
        let validators = Validators::new()
            .field("grade", |raw: &RawInput| validate_numeric(raw, &NumericOptions::range(0.0, 10.0)));

        let result = validate_all_with([("grade", "0")], &validators, &logger);
        assert!(result.is_valid);
        assert_eq!(result.value("grade"), Some(&VerdictValue::Number(0.0)));

        let result = validate_all_with([("grade", "abc")], &validators, &logger);
        assert_eq!(result.error("grade"), Some("must be a number"));
        assert_eq!(result.text("grade"), Some(""));
    }

    #[test]
    fn builds_from_field_kinds() {
        let validators: Validators = [("q", FieldKind::Search), ("user", FieldKind::Login)]
            .into_iter()
            .collect();
        assert!(validators.contains("q"));
        assert!(validators.contains("user"));
        assert!(!validators.contains("other"));
        assert_eq!(format!("{:?}", validators), r#"Validators { fields: ["q", "user"] }"#);
    }

    #[test]
    fn validates_json_records() {
        let (logger, sink) = memory_logger();
        let record = json!({
            "username": "joao.silva",
            "password": "<script>",
            "age": 12
        });
        let validators = login_validators().kind("age", FieldKind::Numeric(NumericOptions::range(5.0, 18.0)));

        let result = validate_json_with(&record, &validators, &logger);
        assert!(!result.is_valid);
        assert_eq!(result.text("username"), Some("joao.silva"));
        assert_eq!(result.error("password"), Some("disallowed characters"));
        assert_eq!(result.value("age"), Some(&VerdictValue::Number(12.0)));
        assert_eq!(sink.len(), 1);

        let result = validate_json_with(&json!(["not", "an", "object"]), &validators, &logger);
        assert!(result.is_valid);
        assert!(result.sanitized.is_empty());
    }

    #[test]
    fn empty_record_is_valid() {
        let (logger, _) = memory_logger();
        let inputs: Vec<(String, RawInput)> = Vec::new();
        let result = validate_all_with(inputs, &login_validators(), &logger);
        assert!(result.is_valid);
    }
}
