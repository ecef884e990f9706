//! Form validation.
//!
//! Every submission is a plain struct of raw strings. Its `validate` method
//! either returns the cleaned value or a [`FieldErrors`] map that the view
//! renders next to the offending fields.

mod account;
mod blog;

use std::collections::BTreeMap;

use serde::Serialize;

pub use account::{
    AccountChanges, AccountEditForm, LoginForm, NewAccount, ProfileChanges, ProfileEditForm,
    RegistrationForm, UserEditForm,
};
pub use blog::{CommentForm, NewComment, PostDraft, PostForm, SearchForm, ShareForm, ShareRequest};

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const INVALID_EMAIL: &str = "Enter a valid email address.";

/// Field name to error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// `Ok(value)` when no error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Trimmed value of a required field, recording an error when blank.
pub(crate) fn required(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    }
    value.to_string()
}

pub(crate) fn max_length(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    let length = value.chars().count();
    if length > max {
        errors.add(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max, length
            ),
        );
    }
}

/// Record an error when a non-empty `value` is not an email address.
pub(crate) fn email(errors: &mut FieldErrors, field: &str, value: &str) {
    if !value.is_empty() && !is_valid_email(value) {
        errors.add(field, INVALID_EMAIL);
    }
}

/// Structural email check: one `@`, a non-empty local part and a dotted
/// domain without empty labels.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_collect_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("title", REQUIRED);
        errors.add("title", "second");
        errors.add("slug", "bad");

        assert_eq!(errors.get("title").len(), 2);
        assert!(errors.contains("slug"));
        assert!(errors.get("body").is_empty());
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let errors = FieldErrors::single("to", INVALID_EMAIL);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["to"][0], INVALID_EMAIL);
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("reader@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("reader"));
        assert!(!is_valid_email("reader@localhost"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email("read er@example.com"));
        assert!(!is_valid_email("reader@example..com"));
    }
}
