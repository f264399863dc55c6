//! Field validators.
//!
//! Each validator sanitizes, runs the injection detectors, applies its
//! field-specific rules and returns a [`ValidationVerdict`]. Checks run in a
//! fixed order: required, length bounds, injection patterns, then format or
//! range. The first failure wins.
//!
//! Validators never log. Callers that want a security trail go through
//! [`crate::batch`] or log explicitly.

use crate::patterns::detect_suspicious;
use crate::raw::RawInput;
use crate::sanitize::sanitize;
use crate::verdict::{NumericOptions, PasswordPolicy, Rejection, ValidationVerdict};
use chrono::NaiveDate;
use regex::Regex;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Minimum login identifier length.
pub const LOGIN_MIN_LEN: usize = 3;

/// Maximum login identifier length.
pub const LOGIN_MAX_LEN: usize = 100;

/// Maximum search term length.
pub const SEARCH_MAX_LEN: usize = 200;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
static SEARCH_STRIP_REGEX: OnceLock<Regex> = OnceLock::new();
static DATE_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap())
}

fn username_regex() -> &'static Regex {
    USERNAME_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z0-9._-]+$").unwrap())
}

// Keeps ASCII word characters, whitespace, hyphens and the Latin-1 Supplement
// and Latin Extended letter blocks.
fn search_strip_regex() -> &'static Regex {
    SEARCH_STRIP_REGEX.get_or_init(|| {
        Regex::new(r"[^0-9A-Za-z_\s\x{00C0}-\x{024F}\x{1E00}-\x{1EFF}-]").unwrap()
    })
}

fn date_regex() -> &'static Regex {
    DATE_REGEX.get_or_init(|| Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").unwrap())
}

fn required_text(raw: &RawInput) -> Option<&str> {
    raw.as_text().filter(|s| !s.is_empty())
}

fn check_length(sanitized: &str, min: usize, max: usize) -> Result<(), Rejection> {
    let len = sanitized.chars().count();
    if len < min {
        return Err(Rejection::TooShort(min));
    }
    if len > max {
        return Err(Rejection::TooLong(max));
    }
    Ok(())
}

/// Validate a login identifier (email or username).
pub fn validate_login_identifier(raw: &RawInput) -> ValidationVerdict {
    let Some(text) = required_text(raw) else {
        return ValidationVerdict::rejected_with(Rejection::Required, "");
    };

    let sanitized = sanitize(text);

    if let Err(rejection) = check_length(&sanitized, LOGIN_MIN_LEN, LOGIN_MAX_LEN) {
        return ValidationVerdict::rejected_with(rejection, sanitized);
    }

    if detect_suspicious(&sanitized) {
        return ValidationVerdict::disallowed();
    }

    if !email_regex().is_match(&sanitized) && !username_regex().is_match(&sanitized) {
        return ValidationVerdict::rejected_with(Rejection::InvalidFormat, sanitized);
    }

    ValidationVerdict::valid(sanitized)
}

/// Validate a password with the default [`PasswordPolicy`].
pub fn validate_password(raw: &RawInput) -> ValidationVerdict {
    validate_password_with(raw, &PasswordPolicy::default())
}

/// Validate a password against `policy`.
///
/// There is no format constraint: any sanitized content within the length
/// bounds and free of injection markers passes.
pub fn validate_password_with(raw: &RawInput, policy: &PasswordPolicy) -> ValidationVerdict {
    let Some(text) = required_text(raw) else {
        return ValidationVerdict::rejected_with(Rejection::Required, "");
    };

    let sanitized = sanitize(text);

    if let Err(rejection) = check_length(&sanitized, policy.min_len, policy.max_len) {
        return ValidationVerdict::rejected_with(rejection, sanitized);
    }

    if detect_suspicious(&sanitized) {
        return ValidationVerdict::disallowed();
    }

    ValidationVerdict::valid(sanitized)
}

/// Validate a free-text search term.
///
/// An absent or empty term is valid and yields `""`.
pub fn validate_search_term(raw: &RawInput) -> ValidationVerdict {
    let Some(text) = required_text(raw) else {
        return ValidationVerdict::valid("");
    };

    let sanitized = sanitize(text);

    if sanitized.chars().count() > SEARCH_MAX_LEN {
        return ValidationVerdict::rejected_with(Rejection::TermTooLong, sanitized);
    }

    if detect_suspicious(&sanitized) {
        return ValidationVerdict::disallowed();
    }

    let cleaned = search_strip_regex().replace_all(&sanitized, "");
    ValidationVerdict::valid(cleaned.into_owned())
}

/// Validate a numeric value against `options`.
pub fn validate_numeric(raw: &RawInput, options: &NumericOptions) -> ValidationVerdict {
    let value = match raw {
        RawInput::Missing => return ValidationVerdict::rejected(Rejection::Required),
        RawInput::Text(s) if s.trim().is_empty() => {
            return ValidationVerdict::rejected(Rejection::Required)
        }
        RawInput::Text(s) => match coerce_number(s) {
            Some(n) => n,
            None => return ValidationVerdict::rejected(Rejection::NotANumber),
        },
        RawInput::Number(n) => *n,
    };

    if value.is_nan() {
        return ValidationVerdict::rejected(Rejection::NotANumber);
    }

    if options.integer_only && !(value.is_finite() && value.fract() == 0.0) {
        return ValidationVerdict::rejected(Rejection::NotAnInteger);
    }

    if value < options.min {
        return ValidationVerdict::rejected_with(Rejection::BelowMin(options.min), value);
    }

    if value > options.max {
        return ValidationVerdict::rejected_with(Rejection::AboveMax(options.max), value);
    }

    ValidationVerdict::valid(value)
}

/// Validate a `DD/MM/YYYY` date.
///
/// Empty text is an unset date, not an error. Days or months that would
/// roll over into the next month or year are rejected.
pub fn validate_date(text: &str) -> Result<Option<NaiveDate>, Rejection> {
    if text.is_empty() {
        return Ok(None);
    }

    let caps = date_regex().captures(text).ok_or(Rejection::DateFormat)?;
    let part = |i: usize| caps[i].parse::<u32>().map_err(|_| Rejection::DateFormat);
    let (day, month) = (part(1)?, part(2)?);
    let year = caps[3].parse::<i32>().map_err(|_| Rejection::DateFormat)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or(Rejection::InvalidDate)
}

/// Coerce text to a number the way a browser form would.
///
/// Accepts surrounding whitespace, signed decimals with optional exponent,
/// unsigned `0x`/`0o`/`0b` literals and `Infinity`.
pub fn coerce_number(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = t.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            return Some(digits.chars().fold(0.0, |acc, c| {
                acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
            }));
        }
    }

    let unsigned = t.strip_prefix(&['+', '-'][..]).unwrap_or(t);
    if unsigned == "Infinity" {
        return Some(if t.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let decimal_chars = t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !decimal_chars {
        return None;
    }
    t.parse::<f64>().ok()
}

/// The semantic type of a form field.
///
/// Resolves a field to its validator at compile time. `Text` is the
/// fallback: sanitize and always accept.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FieldKind {
    /// Email or username.
    Login,
    /// Password with its length policy.
    Password(PasswordPolicy),
    /// Free-text search.
    Search,
    /// Number with bounds.
    Numeric(NumericOptions),
    /// Plain text, sanitized only.
    #[default]
    Text,
}

impl FieldKind {
    /// Password field with the default policy.
    pub fn password() -> Self {
        FieldKind::Password(PasswordPolicy::default())
    }

    /// Unbounded numeric field.
    pub fn numeric() -> Self {
        FieldKind::Numeric(NumericOptions::default())
    }

    /// Tag used in configuration and on the command line.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldKind::Login => "login",
            FieldKind::Password(_) => "password",
            FieldKind::Search => "search",
            FieldKind::Numeric(_) => "numeric",
            FieldKind::Text => "text",
        }
    }

    /// Run the validator for this kind.
    pub fn validate(&self, raw: &RawInput) -> ValidationVerdict {
        match self {
            FieldKind::Login => validate_login_identifier(raw),
            FieldKind::Password(policy) => validate_password_with(raw, policy),
            FieldKind::Search => validate_search_term(raw),
            FieldKind::Numeric(options) => validate_numeric(raw, options),
            FieldKind::Text => ValidationVerdict::valid(crate::sanitize::sanitize_raw(raw)),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FieldKind {
    type Err = Infallible;

    /// Unknown tags resolve to [`FieldKind::Text`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "login" => FieldKind::Login,
            "password" => FieldKind::password(),
            "search" => FieldKind::Search,
            "numeric" => FieldKind::numeric(),
            _ => FieldKind::Text,
        })
    }
}
