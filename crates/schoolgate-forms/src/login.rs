//! Login form state.

use schoolgate_validate::audit::{global_logger, SecurityEventKind, SecurityLogger};
use schoolgate_validate::{
    validate_login_identifier, validate_password_with, PasswordPolicy, RawInput, ValidationVerdict,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The two fields of the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginField {
    Username,
    Password,
}

impl fmt::Display for LoginField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginField::Username => f.write_str("username"),
            LoginField::Password => f.write_str("password"),
        }
    }
}

/// Outcome of checking both credentials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginCheck {
    pub is_valid: bool,
    pub username: String,
    pub password: String,
    pub errors: BTreeMap<LoginField, String>,
}

/// Username and password buffers with their errors.
#[derive(Debug, Clone)]
pub struct LoginForm {
    username: String,
    password: String,
    errors: BTreeMap<LoginField, String>,
    policy: PasswordPolicy,
    logger: SecurityLogger,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::with_logger(global_logger().clone())
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(logger: SecurityLogger) -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            errors: BTreeMap::new(),
            policy: PasswordPolicy::default(),
            logger,
        }
    }

    /// Use a non-default password policy.
    pub fn password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace a buffer. Typing into a field clears its error.
    pub fn update_field(&mut self, field: LoginField, value: impl Into<String>) {
        match field {
            LoginField::Username => self.username = value.into(),
            LoginField::Password => self.password = value.into(),
        }
        self.errors.remove(&field);
    }

    /// Check the credentials currently in the buffers.
    pub fn validate(&mut self) -> LoginCheck {
        let username = RawInput::from(self.username.as_str());
        let password = RawInput::from(self.password.as_str());
        self.validate_login(username, password)
    }

    /// Check a pair of credentials.
    ///
    /// Each credential rejected for disallowed characters is reported as a
    /// `login_sql_injection_attempt`.
    pub fn validate_login(
        &mut self,
        username: impl Into<RawInput>,
        password: impl Into<RawInput>,
    ) -> LoginCheck {
        let username = username.into();
        let password = password.into();
        let username_verdict = validate_login_identifier(&username);
        let password_verdict = validate_password_with(&password, &self.policy);

        let mut errors = BTreeMap::new();
        for (field, raw, verdict) in [
            (LoginField::Username, &username, &username_verdict),
            (LoginField::Password, &password, &password_verdict),
        ] {
            if let Some(message) = verdict.error_message() {
                errors.insert(field, message);
            }
            if verdict.is_disallowed() {
                self.logger
                    .log_event(SecurityEventKind::LoginSqlInjectionAttempt, raw, None);
            }
        }
        self.errors = errors.clone();

        LoginCheck {
            is_valid: username_verdict.is_valid && password_verdict.is_valid,
            username: sanitized_or_empty(&username_verdict),
            password: sanitized_or_empty(&password_verdict),
            errors,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn error(&self, field: LoginField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }
}

fn sanitized_or_empty(verdict: &ValidationVerdict) -> String {
    verdict.sanitized_text().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolgate_validate::audit::InMemorySink;
    use std::sync::Arc;

    fn form() -> (LoginForm, Arc<InMemorySink>) {
        let sink = Arc::new(InMemorySink::new());
        (LoginForm::with_logger(SecurityLogger::from_arc(sink.clone())), sink)
    }

    #[test]
    fn valid_credentials() {
        let (mut form, sink) = form();
        form.update_field(LoginField::Username, " joao.silva ");
        form.update_field(LoginField::Password, "123456");

        let check = form.validate();
        assert!(check.is_valid);
        assert_eq!(check.username, "joao.silva");
        assert_eq!(check.password, "123456");
        assert!(check.errors.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn injection_in_both_fields_logs_twice() {
        let (mut form, sink) = form();
        let check = form.validate_login("admin'--", "x' or '1'='1");

        assert!(!check.is_valid);
        assert_eq!(check.username, "");
        assert_eq!(check.password, "");
        assert_eq!(form.error(LoginField::Username), Some("disallowed characters"));
        assert_eq!(form.error(LoginField::Password), Some("disallowed characters"));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|e| e.kind == SecurityEventKind::LoginSqlInjectionAttempt));
        assert_eq!(events[0].truncated_input, "admin'--");
        assert_eq!(events[1].truncated_input, "x' or '1'='1");
    }

    #[test]
    fn plain_errors_are_not_logged() {
        let (mut form, sink) = form();
        let check = form.validate_login("ab", "");
        assert_eq!(check.errors.get(&LoginField::Username).map(String::as_str), Some("minimum 3 characters"));
        assert_eq!(check.errors.get(&LoginField::Password).map(String::as_str), Some("required field"));
        assert!(sink.is_empty());
    }

    #[test]
    fn typing_clears_only_that_field() {
        let (mut form, _) = form();
        form.validate_login("ab", "");
        form.update_field(LoginField::Username, "abc");
        assert_eq!(form.error(LoginField::Username), None);
        assert_eq!(form.error(LoginField::Password), Some("required field"));
        assert_eq!(form.username(), "abc");

        form.clear_errors();
        assert_eq!(form.error(LoginField::Password), None);
    }

    #[test]
    fn stricter_policy() {
        let (form, _) = form();
        let mut form = form.password_policy(PasswordPolicy::default().with_min_len(8));
        let check = form.validate_login("joao.silva", "123456");
        assert_eq!(check.errors.get(&LoginField::Password).map(String::as_str), Some("minimum 8 characters"));
    }
}
