//! Start/end date pair typed as `DD/MM/YYYY`.

use chrono::NaiveDate;
use schoolgate_validate::validate_date;

/// Which end of a [`DateRangeField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateBound {
    Start,
    End,
}

/// Two date inputs, each with its own error.
///
/// A rejected edit records the error and leaves the previously accepted
/// date in place. Clearing an input accepts it as unset.
#[derive(Debug, Clone, Default)]
pub struct DateRangeField {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    start_error: Option<String>,
    end_error: Option<String>,
}

impl DateRangeField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `text` for one bound. Returns true when it was accepted.
    pub fn change(&mut self, bound: DateBound, text: &str) -> bool {
        let (date, error) = match bound {
            DateBound::Start => (&mut self.start, &mut self.start_error),
            DateBound::End => (&mut self.end, &mut self.end_error),
        };

        match validate_date(text) {
            Ok(parsed) => {
                *date = parsed;
                *error = None;
                true
            }
            Err(rejection) => {
                *error = Some(rejection.to_string());
                false
            }
        }
    }

    pub fn change_start(&mut self, text: &str) -> bool {
        self.change(DateBound::Start, text)
    }

    pub fn change_end(&mut self, text: &str) -> bool {
        self.change(DateBound::End, text)
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn error(&self, bound: DateBound) -> Option<&str> {
        match bound {
            DateBound::Start => self.start_error.as_deref(),
            DateBound::End => self.end_error.as_deref(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.start_error.is_some() || self.end_error.is_some()
    }
}
