//! # SchoolGate
//!
//! Input validation and sanitization for the forms of a school portal.
//!
//! Every value a user types is sanitized, screened against a fixed list of
//! SQL injection and XSS detectors, checked against the rules of its field,
//! and the suspicious attempts are recorded as security events.
//!
//! ## Quick Start
//!
//! ```rust
//! use schoolgate::prelude::*;
//!
//! let validators = Validators::new()
//!     .kind("username", FieldKind::Login)
//!     .kind("password", FieldKind::password())
//!     .kind("grade", FieldKind::Numeric(NumericOptions::range(0.0, 10.0)));
//!
//! let result = validate_all(
//!     [("username", "joao.silva"), ("password", "123456"), ("grade", "11")],
//!     &validators,
//! );
//!
//! assert!(!result.is_valid);
//! assert_eq!(result.error("grade"), Some("maximum value: 10"));
//! assert_eq!(result.text("username"), Some("joao.silva"));
//! ```
//!
//! ## Optional Features
//!
//! - `forms` - validation-state adapters and the login gate (default)
//! - `config` - `SCHOOLGATE_*` configuration with `.env` support (default)
//! - `full` - all optional features enabled
//!
//! ## Security boundary
//!
//! The detectors are best-effort and produce false positives. They are a
//! front-line filter, not a substitute for parameterized queries or output
//! encoding.

// Re-export core functionality
pub use schoolgate_validate::*;

// Re-export form adapters (feature-gated)
#[cfg(feature = "forms")]
pub use schoolgate_forms as forms;
#[cfg(feature = "forms")]
pub use schoolgate_forms::{
    BoundInput, CredentialStore, DateBound, DateRangeField, DebouncedSearch, FilterSelect,
    FormState, InMemoryCredentialStore, LoginCheck, LoginError, LoginField, LoginForm, LoginGate,
    NumericField, PortalUser, SearchBox, SelectOption, UserRole,
};

/// Prelude module - import everything you need with `use schoolgate::prelude::*`
pub mod prelude {
    pub use schoolgate_validate::prelude::*;

    pub use schoolgate_validate::audit::{
        install_global_logger, InMemorySink, JsonLinesSink, SecurityEvent, SecurityEventSink,
        TracingSink,
    };
    pub use schoolgate_validate::{matching_patterns, sanitize_id_list, PatternKind};

    // Form adapters (feature-gated)
    #[cfg(feature = "forms")]
    pub use schoolgate_forms::prelude::*;

    // Configuration types (feature-gated)
    #[cfg(feature = "config")]
    pub use schoolgate_validate::config::{load_dotenv, Environment, GuardConfig, LogFormat};

    // Re-export commonly used external types
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, trace, warn};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_imports_work() {
        let verdict = validate_search_term(&RawInput::from("boletim"));
        assert!(verdict.is_valid);
        assert_eq!(escape_html("<b>"), "&lt;b&gt;");
        debug!(valid = verdict.is_valid, "prelude tracing macros resolve");
    }

    #[test]
    fn prelude_carries_serde_derives() {
        #[derive(Serialize, Deserialize)]
        struct Enrollment {
            student: String,
        }

        let enrollment = Enrollment {
            student: sanitize("  Ana Souza "),
        };
        info!(student = %enrollment.student, "enrollment sanitized");
        assert_eq!(enrollment.student, "Ana Souza");
    }
}
