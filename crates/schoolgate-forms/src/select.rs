//! Allow-list selection.

use serde::{Deserialize, Serialize};

/// One entry of a [`FilterSelect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A dropdown that only accepts values from its option list.
#[derive(Debug, Clone)]
pub struct FilterSelect {
    options: Vec<SelectOption>,
    selected: Option<String>,
    placeholder: String,
    is_open: bool,
}

impl FilterSelect {
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = SelectOption>,
    {
        Self {
            options: options.into_iter().collect(),
            selected: None,
            placeholder: "Select...".to_string(),
            is_open: false,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Select `value`. Values outside the option list are ignored.
    ///
    /// The dropdown closes either way. Returns whether the value was accepted.
    pub fn select(&mut self, value: &str) -> bool {
        self.is_open = false;
        let allowed = self.options.iter().any(|o| o.value == value);
        if allowed {
            self.selected = Some(value.to_string());
        } else {
            tracing::debug!(value, "ignored selection outside the option list");
        }
        allowed
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Label of the selection, or the placeholder.
    pub fn display_label(&self) -> &str {
        self.selected
            .as_deref()
            .and_then(|value| self.options.iter().find(|o| o.value == value))
            .map(|o| o.label.as_str())
            .unwrap_or(&self.placeholder)
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> FilterSelect {
        FilterSelect::new([
            SelectOption::new("3a", "3º Ano A"),
            SelectOption::new("2b", "2º Ano B"),
        ])
    }

    #[test]
    fn accepts_listed_values_only() {
        let mut select = classes();
        assert_eq!(select.display_label(), "Select...");

        assert!(select.select("2b"));
        assert_eq!(select.selected(), Some("2b"));
        assert_eq!(select.display_label(), "2º Ano B");

        assert!(!select.select("2b' or 1=1"));
        assert_eq!(select.selected(), Some("2b"));
    }

    #[test]
    fn selecting_closes_the_dropdown() {
        let mut select = classes().placeholder("Turma");
        select.toggle();
        assert!(select.is_open());
        select.select("nope");
        assert!(!select.is_open());
        assert_eq!(select.display_label(), "Turma");
    }
}
