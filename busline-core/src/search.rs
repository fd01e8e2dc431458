use busline_shared::GenderPreference;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationErrors;

/// How far ahead a journey may be booked unless configured otherwise
pub const DEFAULT_MAX_ADVANCE_DAYS: u64 = 90;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchFilters {
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub gender: GenderPreference,
}

impl SearchFilters {
    pub fn new(from: impl Into<String>, to: impl Into<String>, date: NaiveDate, gender: GenderPreference) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            date,
            gender,
        }
    }

    /// Check the form against `today` and the booking window
    pub fn validate(&self, today: NaiveDate, max_advance_days: u64) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check(!self.from.trim().is_empty(), "from", "Please select a source city");
        errors.check(!self.to.trim().is_empty(), "to", "Please select a destination city");

        if errors.is_empty() && self.from.trim().eq_ignore_ascii_case(self.to.trim()) {
            errors.add("to", "Source and destination cannot be the same");
        }

        let last_day = today
            .checked_add_days(Days::new(max_advance_days))
            .unwrap_or(NaiveDate::MAX);
        if self.date < today || self.date > last_day {
            errors.add(
                "date",
                format!("Journey date must be between {} and {}", today, last_day),
            );
        }

        errors.into_result()
    }
}
