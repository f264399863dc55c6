//! Login gate: credential validation in front of a user store.
//!
//! Both credentials are validated before the store is consulted, and the
//! store only ever sees sanitized values. Every rejection is reported to the
//! security logger:
//!
//! | outcome | event | payload |
//! |---|---|---|
//! | username rejected | `invalid_username_attempt` | raw username |
//! | password rejected | `invalid_password_attempt` | raw password only if disallowed, subject = username |
//! | no matching user | `failed_login_attempt` | sanitized username |
//! | store failure | `login_system_error` | `"{username}:{error}"` |
//!
//! A password rejected for its length is never written to the event log; the
//! event carries an empty payload and the username as subject. Only a
//! password that tripped the injection detectors is recorded verbatim.

use schoolgate_validate::audit::{global_logger, SecurityEventKind, SecurityLogger};
use schoolgate_validate::{
    validate_login_identifier, validate_password_with, PasswordPolicy, RawInput, Rejection,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// Role of a portal account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Parent,
    Director,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Student => f.write_str("student"),
            UserRole::Parent => f.write_str("parent"),
            UserRole::Director => f.write_str("director"),
        }
    }
}

/// An authenticated portal user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalUser {
    pub id: u64,
    pub username: String,
    pub name: String,
    pub role: UserRole,
    pub school_id: u64,
}

/// Error type for credential store operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Lock poisoned or similar internal failure.
    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Result type for credential store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Why a login was refused.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoginError {
    /// The username failed validation.
    #[error("{0}")]
    InvalidUsername(Rejection),

    /// The password failed validation.
    #[error("{0}")]
    InvalidPassword(Rejection),

    /// No account matches the credentials.
    #[error("invalid credentials, check your username and password")]
    InvalidCredentials,

    /// The store failed.
    #[error("login failed, try again")]
    System(#[from] StoreError),
}

/// Source of portal accounts.
pub trait CredentialStore: Send + Sync {
    /// Find the account matching both sanitized credentials.
    fn find_user(&self, username: &str, password: &str) -> StoreResult<Option<PortalUser>>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<S> {
    fn find_user(&self, username: &str, password: &str) -> StoreResult<Option<PortalUser>> {
        (**self).find_user(username, password)
    }
}

/// Credential store held in memory, for demos and tests.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    accounts: RwLock<HashMap<String, (String, PortalUser)>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account (builder form).
    pub fn with_user(self, user: PortalUser, password: impl Into<String>) -> Self {
        self.insert(user, password);
        self
    }

    /// Add or replace an account.
    pub fn insert(&self, user: PortalUser, password: impl Into<String>) {
        if let Ok(mut accounts) = self.accounts.write() {
            accounts.insert(user.username.clone(), (password.into(), user));
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_user(&self, username: &str, password: &str) -> StoreResult<Option<PortalUser>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;

        Ok(accounts
            .get(username)
            .filter(|(stored, _)| stored == password)
            .map(|(_, user)| user.clone()))
    }
}

/// Validates credentials, consults the store and logs every refusal.
#[derive(Debug)]
pub struct LoginGate<S> {
    store: S,
    policy: PasswordPolicy,
    logger: SecurityLogger,
}

impl<S: CredentialStore> LoginGate<S> {
    /// Gate over `store`, reporting to the process-wide logger.
    pub fn new(store: S) -> Self {
        Self::with_logger(store, global_logger().clone())
    }

    pub fn with_logger(store: S, logger: SecurityLogger) -> Self {
        Self {
            store,
            policy: PasswordPolicy::default(),
            logger,
        }
    }

    /// Use a non-default password policy.
    pub fn password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Attempt a login.
    pub fn login(
        &self,
        username: impl Into<RawInput>,
        password: impl Into<RawInput>,
    ) -> Result<PortalUser, LoginError> {
        let username = username.into();
        let password = password.into();

        let username_verdict = validate_login_identifier(&username);
        if let Some(rejection) = username_verdict.error.clone() {
            self.logger
                .log_event(SecurityEventKind::InvalidUsernameAttempt, &username, None);
            return Err(LoginError::InvalidUsername(rejection));
        }
        let sanitized_username = username_verdict.sanitized_text().unwrap_or_default();

        let password_verdict = validate_password_with(&password, &self.policy);
        if let Some(rejection) = password_verdict.error.clone() {
            let payload = if rejection == Rejection::Disallowed {
                password
            } else {
                RawInput::Missing
            };
            self.logger.log_event(
                SecurityEventKind::InvalidPasswordAttempt,
                payload,
                Some(sanitized_username),
            );
            return Err(LoginError::InvalidPassword(rejection));
        }
        let sanitized_password = password_verdict.sanitized_text().unwrap_or_default();

        match self.store.find_user(sanitized_username, sanitized_password) {
            Ok(Some(user)) => {
                tracing::info!(
                    user_id = user.id,
                    role = %user.role,
                    school_id = user.school_id,
                    "login succeeded"
                );
                Ok(user)
            }
            Ok(None) => {
                self.logger.log_event(
                    SecurityEventKind::FailedLoginAttempt,
                    sanitized_username,
                    None,
                );
                Err(LoginError::InvalidCredentials)
            }
            Err(e) => {
                tracing::error!(error = %e, "credential store failed during login");
                self.logger.log_event(
                    SecurityEventKind::LoginSystemError,
                    format!("{}:{}", username, e),
                    None,
                );
                Err(LoginError::System(e))
            }
        }
    }
}
