//! Form validation
//!
//! Field rules applied before any network call. Validators return every
//! violation, not just the first, so a form can mark all bad fields at once.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::scan::TagSet;

pub const INVALID_EMAIL: &str = "Invalid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const DISPLAY_NAME_TOO_SHORT: &str = "Display name must be at least 2 characters";
pub const FOOD_NAME_TOO_SHORT: &str = "Food name must be at least 2 characters";
pub const NO_TAGS: &str = "Select at least one tag";
pub const MISSING_RESET_TOKEN: &str = "Reset link is missing or invalid";

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_DISPLAY_NAME_LEN: usize = 2;
pub const MIN_FOOD_NAME_LEN: usize = 2;

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").ok()
});

/// One rule violation on one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type Validation = Result<(), Vec<FieldError>>;

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match EMAIL_RE.as_ref() {
        Some(re) => re.is_match(email),
        None => email.split_once('@').is_some_and(|(l, d)| !l.is_empty() && d.contains('.')),
    }
}

fn char_len(s: &str) -> usize {
    s.trim().chars().count()
}

fn finish(errors: Vec<FieldError>) -> Validation {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", INVALID_EMAIL));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    // Passwords are not trimmed
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new("password", PASSWORD_TOO_SHORT));
    }
}

pub fn validate_login(email: &str, password: &str) -> Validation {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    check_password(password, &mut errors);
    finish(errors)
}

pub fn validate_register(email: &str, password: &str, display_name: &str) -> Validation {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    check_password(password, &mut errors);
    if char_len(display_name) < MIN_DISPLAY_NAME_LEN {
        errors.push(FieldError::new("display_name", DISPLAY_NAME_TOO_SHORT));
    }
    finish(errors)
}

pub fn validate_forgot_password(email: &str) -> Validation {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    finish(errors)
}

pub fn validate_reset_password(token: &str, password: &str) -> Validation {
    let mut errors = Vec::new();
    if token.trim().is_empty() {
        errors.push(FieldError::new("token", MISSING_RESET_TOKEN));
    }
    check_password(password, &mut errors);
    finish(errors)
}

pub fn validate_scan(food_name: &str, tags: &TagSet) -> Validation {
    let mut errors = Vec::new();
    if char_len(food_name) < MIN_FOOD_NAME_LEN {
        errors.push(FieldError::new("food_name", FOOD_NAME_TOO_SHORT));
    }
    if tags.is_empty() {
        errors.push(FieldError::new("tags", NO_TAGS));
    }
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriscan_types::Tag;

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("admin@admin.com"));
        assert!(is_valid_email(" user@x.co.uk "));
        assert!(!is_valid_email("admin"));
        assert!(!is_valid_email("admin@"));
        assert!(!is_valid_email("@admin.com"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn test_login_reports_every_field() {
        let errors = validate_login("nope", "123").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], FieldError::new("email", INVALID_EMAIL));
        assert_eq!(errors[1].message, PASSWORD_TOO_SHORT);

        assert!(validate_login("admin@admin.com", "adminn").is_ok());
    }

    #[test]
    fn test_register_display_name_is_trimmed() {
        let errors = validate_register("a@b.com", "secret1", " B ").unwrap_err();
        assert_eq!(errors, vec![FieldError::new("display_name", DISPLAY_NAME_TOO_SHORT)]);
        assert!(validate_register("a@b.com", "secret1", "Bo").is_ok());
    }

    #[test]
    fn test_reset_requires_token() {
        let errors = validate_reset_password("  ", "secret1").unwrap_err();
        assert_eq!(errors[0].field, "token");
        assert!(validate_reset_password("tok", "secret1").is_ok());
    }

    #[test]
    fn test_scan_rules() {
        let mut tags = TagSet::default();
        let errors = validate_scan("G", &tags).unwrap_err();
        assert_eq!(errors.len(), 2);

        tags.toggle(Tag::Healthy);
        assert!(validate_scan("Granola", &tags).is_ok());
    }

    #[test]
    fn test_field_error_display() {
        assert_eq!(
            FieldError::new("tags", NO_TAGS).to_string(),
            "tags: Select at least one tag"
        );
    }
}
