//! Configuration loaded from `SCHOOLGATE_*` environment variables.
//!
//! # Example
//!
//! ```ignore
//! use schoolgate_validate::config::{load_dotenv, GuardConfig};
//!
//! load_dotenv();
//! let config = GuardConfig::from_env()?;
//! let policy = config.password_policy();
//! let logger = config.security_logger()?;
//! ```

use crate::audit::{FanoutSink, JsonLinesSink, SecurityLogger, SinkResult, TracingSink};
use crate::verdict::{PasswordPolicy, DEFAULT_PASSWORD_MAX_LEN, DEFAULT_PASSWORD_MIN_LEN};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Prefix shared by every configuration variable.
pub const ENV_PREFIX: &str = "SCHOOLGATE_";

/// Variable holding the environment profile.
pub const ENV_PROFILE_VAR: &str = "SCHOOLGATE_ENV";

/// Error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),

    /// Password bounds are inconsistent.
    #[error("Invalid password bounds: minimum {min} exceeds maximum {max}")]
    InvalidPasswordBounds { min: usize, max: usize },

    /// Unknown log format.
    #[error("Unknown log format: {0}")]
    UnknownLogFormat(String),
}

/// Environment profile, detected from `SCHOOLGATE_ENV`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Environment {
    /// Verbose logging.
    Development,
    /// Quieter logging.
    Production,
    /// Any other profile name.
    Custom(String),
}

impl Environment {
    /// Detect the current profile. Unset means development.
    pub fn current() -> Self {
        std::env::var(ENV_PROFILE_VAR)
            .map(Environment::from)
            .unwrap_or(Environment::Development)
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Get the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Log level used when none is configured.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Production | Self::Custom(_) => "info",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::Development
    }
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        match value.as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" | "" => Self::Development,
            _ => Self::Custom(value),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, multi-line.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::UnknownLogFormat(other.to_string())),
        }
    }
}

fn default_password_min_length() -> usize {
    DEFAULT_PASSWORD_MIN_LEN
}

fn default_password_max_length() -> usize {
    DEFAULT_PASSWORD_MAX_LEN
}

/// Settings for the input gate.
///
/// Each field reads from `SCHOOLGATE_<FIELD>`; every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GuardConfig {
    /// `SCHOOLGATE_PASSWORD_MIN_LENGTH`
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,
    /// `SCHOOLGATE_PASSWORD_MAX_LENGTH`
    #[serde(default = "default_password_max_length")]
    pub password_max_length: usize,
    /// `SCHOOLGATE_LOG_LEVEL`; falls back to the profile default.
    #[serde(default)]
    pub log_level: Option<String>,
    /// `SCHOOLGATE_LOG_FORMAT`
    #[serde(default)]
    pub log_format: LogFormat,
    /// `SCHOOLGATE_EVENT_LOG`: JSON Lines file for security events.
    #[serde(default)]
    pub event_log: Option<PathBuf>,
    /// `SCHOOLGATE_ENV`
    #[serde(default)]
    pub env: Environment,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            password_min_length: DEFAULT_PASSWORD_MIN_LEN,
            password_max_length: DEFAULT_PASSWORD_MAX_LEN,
            log_level: None,
            log_format: LogFormat::default(),
            event_log: None,
            env: Environment::default(),
        }
    }
}

impl GuardConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the password
    /// bounds are inverted.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Load from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: GuardConfig = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.password_min_length > self.password_max_length {
            return Err(ConfigError::InvalidPasswordBounds {
                min: self.password_min_length,
                max: self.password_max_length,
            });
        }
        Ok(())
    }

    /// Password policy built from the configured bounds.
    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy::new(self.password_min_length, self.password_max_length)
    }

    /// Effective log level directive.
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| self.env.default_log_level())
    }

    /// Security logger for this configuration.
    ///
    /// Always writes to `tracing`; also appends to the event log file when
    /// one is configured.
    pub fn security_logger(&self) -> SinkResult<SecurityLogger> {
        match &self.event_log {
            Some(path) => {
                let file = JsonLinesSink::open(path.clone())?;
                Ok(SecurityLogger::new(
                    FanoutSink::new().with(TracingSink).with(file),
                ))
            }
            None => Ok(SecurityLogger::tracing()),
        }
    }
}

/// Load environment variables from a `.env` file, if one exists.
///
/// Existing variables take precedence over `.env` values.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Load environment variables from a specific file path.
pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
    let _ = dotenvy::from_path(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::SecurityEventKind;
    use serial_test::serial;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = GuardConfig::from_vars(Vec::new()).unwrap();
        assert_eq!(config, GuardConfig::default());
        assert_eq!(config.password_policy(), PasswordPolicy::default());
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_prefixed_variables() {
        let config = GuardConfig::from_vars(vars(&[
            ("SCHOOLGATE_PASSWORD_MIN_LENGTH", "12"),
            ("SCHOOLGATE_LOG_FORMAT", "json"),
            ("SCHOOLGATE_ENV", "production"),
            ("SCHOOLGATE_EVENT_LOG", "/var/log/schoolgate/events.jsonl"),
            ("PASSWORD_MIN_LENGTH", "99"),
        ]))
        .unwrap();

        assert_eq!(config.password_policy(), PasswordPolicy::new(12, 128));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.env.is_production());
        assert_eq!(config.log_level(), "info");
        assert_eq!(
            config.event_log,
            Some(PathBuf::from("/var/log/schoolgate/events.jsonl"))
        );
    }

    #[test]
    fn explicit_log_level_wins() {
        let config = GuardConfig::from_vars(vars(&[
            ("SCHOOLGATE_ENV", "production"),
            ("SCHOOLGATE_LOG_LEVEL", "schoolgate=trace"),
        ]))
        .unwrap();
        assert_eq!(config.log_level(), "schoolgate=trace");
    }

    #[test]
    fn rejects_bad_values() {
        let err = GuardConfig::from_vars(vars(&[("SCHOOLGATE_PASSWORD_MIN_LENGTH", "many")]));
        assert!(matches!(err, Err(ConfigError::Env(_))));

        let err = GuardConfig::from_vars(vars(&[
            ("SCHOOLGATE_PASSWORD_MIN_LENGTH", "200"),
            ("SCHOOLGATE_PASSWORD_MAX_LENGTH", "100"),
        ]));
        assert!(matches!(
            err,
            Err(ConfigError::InvalidPasswordBounds { min: 200, max: 100 })
        ));
    }

    #[test]
    fn environment_names() {
        assert_eq!(Environment::from("prod".to_string()), Environment::Production);
        assert_eq!(Environment::from("dev".to_string()), Environment::Development);
        assert_eq!(
            Environment::from("staging".to_string()).to_string(),
            "staging"
        );
        assert_eq!(Environment::Custom("staging".into()).default_log_level(), "info");
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    #[serial]
    fn environment_detection_from_process() {
        std::env::remove_var(ENV_PROFILE_VAR);
        assert!(Environment::current().is_development());

        std::env::set_var(ENV_PROFILE_VAR, "production");
        assert!(Environment::current().is_production());

        std::env::remove_var(ENV_PROFILE_VAR);
    }

    #[test]
    #[serial]
    fn from_env_reads_process_variables() {
        std::env::set_var("SCHOOLGATE_PASSWORD_MAX_LENGTH", "64");
        let config = GuardConfig::from_env().unwrap();
        assert_eq!(config.password_max_length, 64);
        std::env::remove_var("SCHOOLGATE_PASSWORD_MAX_LENGTH");
    }

    #[test]
    fn event_log_file_receives_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let config = GuardConfig {
            event_log: Some(path.clone()),
            ..GuardConfig::default()
        };

        let logger = config.security_logger().unwrap();
        logger.log_event(SecurityEventKind::SqlInjectionAttempt, "' or 1=1", None);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("sql_injection_attempt"));
    }
}
