//! Numeric input state.

use schoolgate_validate::{validate_numeric, NumericOptions, RawInput};

/// A numeric text input with bounds.
///
/// Blank text is not an error: it clears the field and yields no value.
#[derive(Debug, Clone, Default)]
pub struct NumericField {
    options: NumericOptions,
    text: String,
    error: Option<String>,
}

impl NumericField {
    pub fn new(options: NumericOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Replace the text; the validated number when it passes.
    pub fn change_text(&mut self, text: impl Into<String>) -> Option<f64> {
        self.text = text.into();

        if self.text.trim().is_empty() {
            self.error = None;
            return None;
        }

        let verdict = validate_numeric(&RawInput::from(self.text.as_str()), &self.options);
        self.error = verdict.error_message();
        if verdict.is_valid {
            verdict.sanitized_number()
        } else {
            None
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn options(&self) -> &NumericOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_field() {
        let mut field = NumericField::new(NumericOptions::range(0.0, 10.0));

        assert_eq!(field.change_text("8.5"), Some(8.5));
        assert_eq!(field.error(), None);

        assert_eq!(field.change_text("12"), None);
        assert_eq!(field.error(), Some("maximum value: 10"));

        assert_eq!(field.change_text("   "), None);
        assert_eq!(field.error(), None);
        assert_eq!(field.text(), "   ");
    }

    #[test]
    fn integer_only_field() {
        let mut field = NumericField::new(NumericOptions::range(1.0, 12.0).integer_only(true));
        assert_eq!(field.change_text("3"), Some(3.0));
        assert_eq!(field.change_text("3.5"), None);
        assert_eq!(field.error(), Some("must be an integer"));
        assert_eq!(field.change_text("três"), None);
        assert_eq!(field.error(), Some("must be a number"));
    }
}
