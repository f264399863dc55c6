//! Raw form values as they arrive from input handlers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value handed over by a form field before any validation.
///
/// Form handlers deliver text most of the time, but numeric widgets may hand
/// over numbers and cleared widgets hand over nothing at all.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInput {
    /// No value (null / undefined / unsupported type).
    #[default]
    Missing,
    /// A numeric value.
    Number(f64),
    /// A text value, unsanitized.
    Text(String),
}

impl RawInput {
    /// Borrow the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawInput::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for `Missing` and for the empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            RawInput::Missing => true,
            RawInput::Text(s) => s.is_empty(),
            RawInput::Number(_) => false,
        }
    }
}

impl fmt::Display for RawInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawInput::Missing => Ok(()),
            RawInput::Number(n) => write!(f, "{}", n),
            RawInput::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        RawInput::Text(value.to_string())
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        RawInput::Text(value)
    }
}

impl From<&String> for RawInput {
    fn from(value: &String) -> Self {
        RawInput::Text(value.clone())
    }
}

impl From<&RawInput> for RawInput {
    fn from(value: &RawInput) -> Self {
        value.clone()
    }
}

impl From<f64> for RawInput {
    fn from(value: f64) -> Self {
        RawInput::Number(value)
    }
}

impl From<f32> for RawInput {
    fn from(value: f32) -> Self {
        RawInput::Number(f64::from(value))
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RawInput {
                fn from(value: $t) -> Self {
                    RawInput::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl<T: Into<RawInput>> From<Option<T>> for RawInput {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawInput::Missing)
    }
}

impl From<serde_json::Value> for RawInput {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => RawInput::Text(s),
            serde_json::Value::Number(n) => n.as_f64().map(RawInput::Number).unwrap_or_default(),
            _ => RawInput::Missing,
        }
    }
}

impl From<&serde_json::Value> for RawInput {
    fn from(value: &serde_json::Value) -> Self {
        RawInput::from(value.clone())
    }
}
