//! Verdict types returned by the field validators.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A sanitized value carried by a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerdictValue {
    /// Sanitized text.
    Text(String),
    /// Coerced number.
    Number(f64),
}

impl VerdictValue {
    /// The empty text value.
    pub fn empty() -> Self {
        VerdictValue::Text(String::new())
    }

    /// Borrow the text, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            VerdictValue::Text(s) => Some(s),
            VerdictValue::Number(_) => None,
        }
    }

    /// The number, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            VerdictValue::Number(n) => Some(*n),
            VerdictValue::Text(_) => None,
        }
    }
}

impl fmt::Display for VerdictValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictValue::Text(s) => f.write_str(s),
            VerdictValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for VerdictValue {
    fn from(value: &str) -> Self {
        VerdictValue::Text(value.to_string())
    }
}

impl From<String> for VerdictValue {
    fn from(value: String) -> Self {
        VerdictValue::Text(value)
    }
}

impl From<f64> for VerdictValue {
    fn from(value: f64) -> Self {
        VerdictValue::Number(value)
    }
}

/// Why a field was rejected.
///
/// The `Display` output is the message shown next to the offending field.
/// Checks run in a fixed order (required, length, injection, format/range)
/// and the first failure wins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    /// Missing, empty, or wrong-typed value.
    #[error("required field")]
    Required,

    /// Sanitized text shorter than the minimum.
    #[error("minimum {0} characters")]
    TooShort(usize),

    /// Sanitized text longer than the maximum.
    #[error("maximum {0} characters")]
    TooLong(usize),

    /// Search term longer than the search limit.
    #[error("term too long")]
    TermTooLong,

    /// An injection pattern matched.
    #[error("disallowed characters")]
    Disallowed,

    /// Neither an email nor a username.
    #[error("invalid format")]
    InvalidFormat,

    /// Value could not be coerced to a number.
    #[error("must be a number")]
    NotANumber,

    /// Integral value required.
    #[error("must be an integer")]
    NotAnInteger,

    /// Below the configured minimum.
    #[error("minimum value: {0}")]
    BelowMin(f64),

    /// Above the configured maximum.
    #[error("maximum value: {0}")]
    AboveMax(f64),

    /// Date text not shaped like `DD/MM/YYYY`.
    #[error("invalid format (DD/MM/YYYY)")]
    DateFormat,

    /// Well-formed date that does not exist on the calendar.
    #[error("invalid date")]
    InvalidDate,
}

impl Rejection {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::Required => "required",
            Rejection::TooShort(_) => "min_length",
            Rejection::TooLong(_) => "max_length",
            Rejection::TermTooLong => "too_long",
            Rejection::Disallowed => "disallowed",
            Rejection::InvalidFormat => "format",
            Rejection::NotANumber => "not_a_number",
            Rejection::NotAnInteger => "not_an_integer",
            Rejection::BelowMin(_) => "below_min",
            Rejection::AboveMax(_) => "above_max",
            Rejection::DateFormat => "date_format",
            Rejection::InvalidDate => "invalid_date",
        }
    }
}

impl Serialize for Rejection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Rejection", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result of validating a single field.
///
/// `error` is present iff `is_valid` is false. When an injection pattern was
/// detected, `sanitized_value` holds the empty string, never the flagged text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationVerdict {
    /// Whether the field passed every check.
    pub is_valid: bool,
    /// Cleaned value, when there is one worth returning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized_value: Option<VerdictValue>,
    /// First failing check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Rejection>,
}

impl ValidationVerdict {
    /// A passing verdict.
    pub fn valid(value: impl Into<VerdictValue>) -> Self {
        Self {
            is_valid: true,
            sanitized_value: Some(value.into()),
            error: None,
        }
    }

    /// A failing verdict with no sanitized value.
    pub fn rejected(error: Rejection) -> Self {
        Self {
            is_valid: false,
            sanitized_value: None,
            error: Some(error),
        }
    }

    /// A failing verdict that still carries the sanitized value.
    pub fn rejected_with(error: Rejection, value: impl Into<VerdictValue>) -> Self {
        Self {
            is_valid: false,
            sanitized_value: Some(value.into()),
            error: Some(error),
        }
    }

    /// A failing verdict for flagged input. The sanitized value is forced empty.
    pub fn disallowed() -> Self {
        Self::rejected_with(Rejection::Disallowed, VerdictValue::empty())
    }

    /// Human-readable error message, if rejected.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// True when the rejection reason is an injection match.
    pub fn is_disallowed(&self) -> bool {
        matches!(self.error, Some(Rejection::Disallowed))
    }

    /// Sanitized text, if the value is textual.
    pub fn sanitized_text(&self) -> Option<&str> {
        self.sanitized_value.as_ref().and_then(VerdictValue::as_text)
    }

    /// Coerced number, if the value is numeric.
    pub fn sanitized_number(&self) -> Option<f64> {
        self.sanitized_value.as_ref().and_then(VerdictValue::as_number)
    }
}

/// Bounds for the numeric validator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericOptions {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// Reject non-integral values.
    pub integer_only: bool,
}

impl Default for NumericOptions {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            integer_only: false,
        }
    }
}

impl NumericOptions {
    /// Unbounded options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with both bounds set.
    pub fn range(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            integer_only: false,
        }
    }

    /// Set the lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.min = min;
        self
    }

    /// Set the upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    /// Require integral values.
    pub fn integer_only(mut self, integer_only: bool) -> Self {
        self.integer_only = integer_only;
        self
    }
}

/// Default minimum password length.
///
/// Three characters is far too weak for production deployments; raise it
/// through [`PasswordPolicy`] or `SCHOOLGATE_PASSWORD_MIN_LENGTH`.
pub const DEFAULT_PASSWORD_MIN_LEN: usize = 3;

/// Default maximum password length.
pub const DEFAULT_PASSWORD_MAX_LEN: usize = 128;

/// Length policy for the password validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    /// Minimum length in characters (inclusive).
    pub min_len: usize,
    /// Maximum length in characters (inclusive).
    pub max_len: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_PASSWORD_MIN_LEN,
            max_len: DEFAULT_PASSWORD_MAX_LEN,
        }
    }
}

impl PasswordPolicy {
    /// Policy with explicit bounds.
    pub fn new(min_len: usize, max_len: usize) -> Self {
        Self { min_len, max_len }
    }

    /// Replace the minimum length.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages() {
        assert_eq!(Rejection::Required.to_string(), "required field");
        assert_eq!(Rejection::TooShort(3).to_string(), "minimum 3 characters");
        assert_eq!(Rejection::TooLong(100).to_string(), "maximum 100 characters");
        assert_eq!(Rejection::Disallowed.to_string(), "disallowed characters");
        assert_eq!(Rejection::AboveMax(10.0).to_string(), "maximum value: 10");
        assert_eq!(Rejection::BelowMin(-2.5).to_string(), "minimum value: -2.5");
    }

    #[test]
    fn disallowed_verdict_is_emptied() {
        let verdict = ValidationVerdict::disallowed();
        assert!(!verdict.is_valid);
        assert!(verdict.is_disallowed());
        assert_eq!(verdict.sanitized_text(), Some(""));
    }

    #[test]
    fn verdict_serialization() {
        let verdict = ValidationVerdict::rejected(Rejection::NotANumber);
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["is_valid"], false);
        assert_eq!(json["error"]["code"], "not_a_number");
        assert_eq!(json["error"]["message"], "must be a number");
        assert!(json.get("sanitized_value").is_none());

        let verdict = ValidationVerdict::valid(7.0);
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["sanitized_value"], 7.0);
    }

    #[test]
    fn numeric_options_builder() {
        let opts = NumericOptions::new().min(0.0).max(10.0).integer_only(true);
        assert_eq!(opts, NumericOptions::range(0.0, 10.0).integer_only(true));
        assert!(NumericOptions::default().min.is_infinite());
    }
}
