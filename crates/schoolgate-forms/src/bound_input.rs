//! A text input with an optional validator attached.

use schoolgate_validate::{FieldKind, RawInput, VerdictValue};

/// What a [`BoundInput`] hands on after a change.
#[derive(Debug, Clone, PartialEq)]
pub struct InputChange {
    /// Text to forward to the owner of the field.
    pub text: String,
    /// Current error, if any.
    pub error: Option<String>,
}

/// Wraps a text field with an optional [`FieldKind`].
///
/// Without a kind, text passes through untouched.
#[derive(Debug, Clone, Default)]
pub struct BoundInput {
    field_name: String,
    kind: Option<FieldKind>,
    error: Option<String>,
}

impl BoundInput {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            ..Self::default()
        }
    }

    /// Attach a validator.
    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Handle a change of text.
    ///
    /// Forwards the sanitized value when the text is valid and sanitizing
    /// left something behind, otherwise the text as typed.
    pub fn change_text(&mut self, text: impl Into<String>) -> InputChange {
        let text = text.into();
        let Some(kind) = &self.kind else {
            return InputChange { text, error: None };
        };

        let verdict = kind.validate(&RawInput::from(text.as_str()));
        self.error = verdict.error_message();

        let forwarded = match (&verdict.sanitized_value, verdict.is_valid) {
            (Some(VerdictValue::Text(s)), true) if !s.is_empty() => s.clone(),
            (Some(VerdictValue::Number(n)), true) => n.to_string(),
            _ => text,
        };

        if let Some(error) = &self.error {
            tracing::trace!(field = %self.field_name, %error, "bound input rejected");
        }

        InputChange {
            text: forwarded,
            error: self.error.clone(),
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
