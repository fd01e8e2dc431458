//! Field validation for signup, passenger and payment forms.
//!
//! Each validator is a plain predicate; the `check_*` helpers collect failures
//! into [`ValidationErrors`] keyed by form field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Indian mobile numbers: ten digits starting with 6-9.
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9]\d{9}$").expect("valid regex"));

static UPI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+@[\w.-]+$").expect("valid regex"));

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid regex"));

pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 120;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_RE.is_match(mobile)
}

pub fn is_valid_upi_id(upi_id: &str) -> bool {
    UPI_RE.is_match(upi_id)
}

pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() >= 2 && NAME_RE.is_match(name)
}

pub fn is_valid_age(age: u32) -> bool {
    (MIN_AGE..=MAX_AGE).contains(&age)
}

pub fn is_valid_password(password: &str, min_length: usize) -> bool {
    password.chars().count() >= min_length
}

/// Keep only the digits of a phone number as typed
pub fn normalize_mobile(mobile: &str) -> String {
    mobile.chars().filter(char::is_ascii_digit).collect()
}

/// Failed fields and their user-facing messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.insert(field.into(), message.into());
    }

    /// Record `message` under `field` when `valid` is false
    pub fn check(&mut self, valid: bool, field: impl Into<String>, message: impl Into<String>) {
        if !valid {
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn check_email(errors: &mut ValidationErrors, field: &str, email: &str) {
    errors.check(is_valid_email(email), field, "Please enter a valid email address");
}

pub fn check_mobile(errors: &mut ValidationErrors, field: &str, mobile: &str) {
    errors.check(
        is_valid_mobile(mobile),
        field,
        "Please enter a valid 10-digit mobile number",
    );
}

pub fn check_upi_id(errors: &mut ValidationErrors, field: &str, upi_id: &str) {
    errors.check(
        is_valid_upi_id(upi_id),
        field,
        "Please enter a valid UPI ID (e.g., username@bankname)",
    );
}

pub fn check_password(errors: &mut ValidationErrors, field: &str, password: &str, min_length: usize) {
    errors.check(
        is_valid_password(password, min_length),
        field,
        format!("Password must be at least {} characters", min_length),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("asha@example.com"));
        assert!(!is_valid_email("asha@example"));
        assert!(!is_valid_email("asha example@x.com"));
    }

    #[test]
    fn test_mobile() {
        assert!(is_valid_mobile("9876543210"));
        assert!(!is_valid_mobile("5876543210"));
        assert!(!is_valid_mobile("98765"));
        assert_eq!(normalize_mobile("98765-43210"), "9876543210");
    }

    #[test]
    fn test_upi() {
        assert!(is_valid_upi_id("asha.k@okbank"));
        assert!(!is_valid_upi_id("asha"));
        assert!(!is_valid_upi_id("asha@bank@x"));
    }

    #[test]
    fn test_name_and_age() {
        assert!(is_valid_name("Asha K"));
        assert!(!is_valid_name(" A "));
        assert!(!is_valid_name("R2D2"));
        assert!(is_valid_age(1) && is_valid_age(120));
        assert!(!is_valid_age(0) && !is_valid_age(121));
    }

    #[test]
    fn test_collects_messages() {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", "bad");
        check_password(&mut errors, "password", "123", 6);
        check_mobile(&mut errors, "mobile", "9876543210");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("password"), Some("Password must be at least 6 characters"));
        assert!(!errors.contains("mobile"));
        assert!(errors.into_result().is_err());
    }
}
