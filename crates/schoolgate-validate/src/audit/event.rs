//! Security event types

use crate::raw::RawInput;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of input characters kept in a security event.
pub const MAX_LOGGED_INPUT_LEN: usize = 200;

/// Kinds of suspicious or rejected attempts.
///
/// The string forms are consumed by monitoring and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventKind {
    /// Login identifier failed validation.
    InvalidUsernameAttempt,
    /// Password failed validation.
    InvalidPasswordAttempt,
    /// Credentials were well-formed but unknown.
    FailedLoginAttempt,
    /// The login flow itself failed.
    LoginSystemError,
    /// Injection markers in a login form credential.
    LoginSqlInjectionAttempt,
    /// Injection markers in a search box.
    SearchSqlInjectionAttempt,
    /// Injection markers found during a batch validation.
    SqlInjectionAttempt,
}

impl SecurityEventKind {
    /// All kinds, in declaration order.
    pub const ALL: [SecurityEventKind; 7] = [
        SecurityEventKind::InvalidUsernameAttempt,
        SecurityEventKind::InvalidPasswordAttempt,
        SecurityEventKind::FailedLoginAttempt,
        SecurityEventKind::LoginSystemError,
        SecurityEventKind::LoginSqlInjectionAttempt,
        SecurityEventKind::SearchSqlInjectionAttempt,
        SecurityEventKind::SqlInjectionAttempt,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityEventKind::InvalidUsernameAttempt => "invalid_username_attempt",
            SecurityEventKind::InvalidPasswordAttempt => "invalid_password_attempt",
            SecurityEventKind::FailedLoginAttempt => "failed_login_attempt",
            SecurityEventKind::LoginSystemError => "login_system_error",
            SecurityEventKind::LoginSqlInjectionAttempt => "login_sql_injection_attempt",
            SecurityEventKind::SearchSqlInjectionAttempt => "search_sql_injection_attempt",
            SecurityEventKind::SqlInjectionAttempt => "sql_injection_attempt",
        }
    }

    /// Whether the event points at an injection payload.
    pub fn is_injection(&self) -> bool {
        matches!(
            self,
            SecurityEventKind::LoginSqlInjectionAttempt
                | SecurityEventKind::SearchSqlInjectionAttempt
                | SecurityEventKind::SqlInjectionAttempt
        )
    }
}

impl fmt::Display for SecurityEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown event kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown security event kind: {0}")]
pub struct UnknownEventKind(pub String);

impl FromStr for SecurityEventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SecurityEventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// A recorded suspicious or rejected attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Unique event identifier (UUID).
    pub id: String,
    /// When the event was recorded (UTC).
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub kind: SecurityEventKind,
    /// Raw input, cut to [`MAX_LOGGED_INPUT_LEN`] characters. Empty for non-text input.
    pub truncated_input: String,
    /// User the attempt is attributed to, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
}

impl SecurityEvent {
    /// Create an event for `raw`.
    pub fn new(kind: SecurityEventKind, raw: &RawInput) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            kind,
            truncated_input: truncate_payload(raw),
            subject_id: None,
        }
    }

    /// Attribute the event to a subject.
    pub fn subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    /// ISO-8601 timestamp with millisecond precision.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

fn truncate_payload(raw: &RawInput) -> String {
    raw.as_text()
        .map(|s| s.chars().take(MAX_LOGGED_INPUT_LEN).collect())
        .unwrap_or_default()
}
