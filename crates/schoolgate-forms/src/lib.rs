//! # SchoolGate Forms
//!
//! Validation state for the portal's input widgets. Each adapter owns only
//! its own error state and delegates the actual checks to
//! [`schoolgate_validate`]. Adapters that can see injection attempts report
//! them to a [`SecurityLogger`](schoolgate_validate::audit::SecurityLogger),
//! the process-wide one unless another is injected with `with_logger`.
//!
//! ## Example
//!
//! ```rust
//! use schoolgate_forms::{LoginForm, LoginField};
//!
//! let mut form = LoginForm::new();
//! form.update_field(LoginField::Username, "joao.silva");
//! form.update_field(LoginField::Password, "12");
//!
//! let check = form.validate();
//! assert!(!check.is_valid);
//! assert_eq!(form.error(LoginField::Password), Some("minimum 3 characters"));
//! ```

pub mod auth;
mod bound_input;
mod date_range;
mod form_state;
mod login;
mod numeric;
mod search;
mod select;

pub use auth::{
    CredentialStore, InMemoryCredentialStore, LoginError, LoginGate, PortalUser, StoreError,
    StoreResult, UserRole,
};
pub use bound_input::{BoundInput, InputChange};
pub use date_range::{DateBound, DateRangeField};
pub use form_state::FormState;
pub use login::{LoginCheck, LoginField, LoginForm};
pub use numeric::NumericField;
pub use search::{DebouncedSearch, SearchBox, DEFAULT_DEBOUNCE};
pub use select::{FilterSelect, SelectOption};

/// Prelude module for form adapters
pub mod prelude {
    pub use crate::auth::{CredentialStore, InMemoryCredentialStore, LoginError, LoginGate, PortalUser};
    pub use crate::{
        BoundInput, DateBound, DateRangeField, DebouncedSearch, FilterSelect, FormState, LoginField,
        LoginForm, NumericField, SearchBox, SelectOption,
    };
}
