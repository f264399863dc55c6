//! # SchoolGate Validate
//!
//! The input gate of the school portal. Every value typed into a form passes
//! through here before it is used: it is sanitized, screened for SQL
//! injection and XSS shapes, checked against its field's rules, and the
//! suspicious attempts are reported to a security event logger.
//!
//! ## Example
//!
//! ```rust
//! use schoolgate_validate::prelude::*;
//!
//! let verdict = validate_login_identifier(&RawInput::from("  joao.silva "));
//! assert!(verdict.is_valid);
//! assert_eq!(verdict.sanitized_text(), Some("joao.silva"));
//!
//! let verdict = validate_login_identifier(&RawInput::from("'; DROP TABLE users; --"));
//! assert_eq!(verdict.error_message().as_deref(), Some("disallowed characters"));
//! assert_eq!(verdict.sanitized_text(), Some(""));
//! ```
//!
//! ## Components
//!
//! - [`patterns`]: the fixed list of injection detectors
//! - [`sanitize`]: whitespace/control cleanup and HTML escaping
//! - [`fields`]: login, password, search and numeric validators
//! - [`batch`]: record-level validation with security logging
//! - [`audit`]: security events, sinks and the process-wide logger
//! - `config`: `SCHOOLGATE_*` environment configuration (feature `config`)
//!
//! ## Security boundary
//!
//! The detectors are a coarse, best-effort filter with expected false
//! positives. They do not replace parameterized queries or output encoding
//! at the layers that talk to the database or render HTML.

pub mod audit;
pub mod batch;
#[cfg(feature = "config")]
pub mod config;
pub mod fields;
pub mod patterns;
mod raw;
pub mod sanitize;
mod verdict;


pub use batch::{validate_all, validate_all_with, validate_json, validate_json_with, BatchResult, Validators};
pub use fields::{
    coerce_number, validate_date, validate_login_identifier, validate_numeric, validate_password,
    validate_password_with, validate_search_term, FieldKind, LOGIN_MAX_LEN, LOGIN_MIN_LEN,
    SEARCH_MAX_LEN,
};
pub use patterns::{detect_suspicious, matching_patterns, PatternKind};
pub use raw::RawInput;
pub use sanitize::{escape_html, sanitize, sanitize_id_list, sanitize_raw, MAX_ID_LIST_LEN, MAX_SANITIZED_LEN};
pub use verdict::{
    NumericOptions, PasswordPolicy, Rejection, ValidationVerdict, VerdictValue,
    DEFAULT_PASSWORD_MAX_LEN, DEFAULT_PASSWORD_MIN_LEN,
};

/// Prelude module for validation
pub mod prelude {
    pub use crate::audit::{log_event, SecurityEventKind, SecurityLogger};
    pub use crate::batch::{validate_all, validate_all_with, validate_json, BatchResult, Validators};
    pub use crate::fields::{
        validate_login_identifier, validate_numeric, validate_password, validate_password_with,
        validate_search_term, FieldKind,
    };
    pub use crate::patterns::detect_suspicious;
    pub use crate::raw::RawInput;
    pub use crate::sanitize::{escape_html, sanitize};
    pub use crate::verdict::{
        NumericOptions, PasswordPolicy, Rejection, ValidationVerdict, VerdictValue,
    };
}
