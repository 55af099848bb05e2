//! # Form Validation
//!
//! Explicit checks for the login and signup forms, run before anything is
//! sent over the network. A failed check yields every field error at once
//! rather than stopping at the first.
//!
//! Rules:
//!
//! | Form   | Field    | Rule                                  |
//! |--------|----------|---------------------------------------|
//! | login  | email    | required, email shape                 |
//! | login  | password | required                              |
//! | signup | name     | required, at least 4 characters       |
//! | signup | email    | required, email shape                 |
//! | signup | address  | optional                              |
//! | signup | role     | required, one of user / owner / admin |
//! | signup | password | required, at least 8 characters       |
//!
//! Whitespace-only input counts as missing.

use crate::model::{NewUser, Role};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const NAME_MIN_LEN: usize = 4;
pub const PASSWORD_MIN_LEN: usize = 8;

/// What went wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    TooShort { min: usize },
    InvalidEmail,
    InvalidChoice,
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Required => write!(f, "{} is required", self.field),
            FieldErrorKind::TooShort { min } => {
                write!(f, "{} must be at least {} characters", self.field, min)
            }
            FieldErrorKind::InvalidEmail => write!(f, "{} is not a valid email", self.field),
            FieldErrorKind::InvalidChoice => write!(f, "{} is not an allowed value", self.field),
        }
    }
}

/// Every field error found on a form. Never empty when returned as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Error)]
#[error("{}", render(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn render(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Errors reported against one field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.0.iter().filter(move |e| e.field == field)
    }

    fn push(&mut self, field: &'static str, kind: FieldErrorKind) {
        self.0.push(FieldError { field, kind });
    }

    fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

// =============================================================================
// FORMS
// =============================================================================

/// Credentials typed into the login form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_email(&mut errors, &self.email);
        if is_blank(&self.password) {
            errors.push("password", FieldErrorKind::Required);
        }
        errors.into_result()
    }
}

/// Fields of the signup form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub role: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        check_min_len(&mut errors, "name", &self.name, NAME_MIN_LEN);
        check_email(&mut errors, &self.email);

        if is_blank(&self.role) {
            errors.push("role", FieldErrorKind::Required);
        } else if !Role::parse(&self.role).is_known() {
            errors.push("role", FieldErrorKind::InvalidChoice);
        }

        check_min_len(&mut errors, "password", &self.password, PASSWORD_MIN_LEN);

        errors.into_result()
    }

    /// The request body sent to the signup endpoint.
    pub fn to_new_user(&self) -> NewUser {
        NewUser::new(
            self.name.clone(),
            self.email.clone(),
            self.password.clone(),
            self.address.clone(),
            self.role.as_str(),
        )
    }
}

// =============================================================================
// RULES
// =============================================================================

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_min_len(errors: &mut ValidationErrors, field: &'static str, value: &str, min: usize) {
    if is_blank(value) {
        errors.push(field, FieldErrorKind::Required);
    } else if value.chars().count() < min {
        errors.push(field, FieldErrorKind::TooShort { min });
    }
}

fn check_email(errors: &mut ValidationErrors, value: &str) {
    if is_blank(value) {
        errors.push("email", FieldErrorKind::Required);
    } else if !looks_like_email(value.trim()) {
        errors.push("email", FieldErrorKind::InvalidEmail);
    }
}

/// `local@domain`, no whitespace, domain made of non-empty dot-separated labels.
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.split('.').all(|label| !label.is_empty())
}

// =============================================================================
// TESTS
// =============================================================================
