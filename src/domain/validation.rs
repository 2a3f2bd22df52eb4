//! Input validation for registration and login.
//!
//! Each request shape has a validator that turns untrusted JSON fields into a
//! typed value or reports the first failing field. Fields are checked in
//! declaration order, so the same input always yields the same error.

use serde_json::Value;
use thiserror::Error;
use validator::ValidateEmail;

use crate::config::MIN_PASSWORD_LENGTH;

/// A single field-level validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn required(field: &str) -> Self {
        Self::new(field, format!("\"{}\" is required", field))
    }

    fn not_a_string(field: &str) -> Self {
        Self::new(field, format!("\"{}\" must be a string", field))
    }

    fn empty(field: &str) -> Self {
        Self::new(field, format!("\"{}\" is not allowed to be empty", field))
    }

    fn unknown(field: &str) -> Self {
        Self::new(field, format!("\"{}\" is not allowed", field))
    }
}

/// Validated registration input. The confirmation field is not retained.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Registration {
    /// Validate raw registration fields.
    ///
    /// The password is trimmed before the length check, and the confirmation
    /// must equal the trimmed password.
    pub fn validate(
        email: Option<&Value>,
        password: Option<&Value>,
        confirm_password: Option<&Value>,
    ) -> Result<Self, ValidationError> {
        let email = match email {
            None => return Err(ValidationError::new("email", "email is required")),
            Some(value) => non_empty("email", string_value("email", value)?)?,
        };
        if !is_valid_email(email) {
            return Err(ValidationError::new("email", "email is invalid"));
        }

        let password = required_string("password", password)?.trim();
        let password = non_empty("password", password)?;
        // Length is measured in UTF-16 code units, so an emoji counts as two.
        if password.encode_utf16().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::new(
                "password",
                format!(
                    "\"password\" length must be at least {} characters long",
                    MIN_PASSWORD_LENGTH
                ),
            ));
        }

        let confirm_password = required_string("confirmPassword", confirm_password)?;
        if confirm_password != password {
            return Err(ValidationError::new(
                "confirmPassword",
                "\"confirmPassword\" must be [ref:password]",
            ));
        }

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// Validated login input. Presence only; no format rules.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    pub fn validate(
        email: Option<&Value>,
        password: Option<&Value>,
    ) -> Result<Self, ValidationError> {
        let email = non_empty("email", required_string("email", email)?)?;
        let password = non_empty("password", required_string("password", password)?)?;

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// Reject any key the request shape does not declare.
pub fn reject_unknown_fields<'a, I>(keys: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a String>,
{
    match keys.into_iter().next() {
        Some(key) => Err(ValidationError::unknown(key)),
        None => Ok(()),
    }
}

fn required_string<'a>(field: &str, value: Option<&'a Value>) -> Result<&'a str, ValidationError> {
    match value {
        None => Err(ValidationError::required(field)),
        Some(value) => string_value(field, value),
    }
}

fn string_value<'a>(field: &str, value: &'a Value) -> Result<&'a str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| ValidationError::not_a_string(field))
}

fn non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::empty(field))
    } else {
        Ok(value)
    }
}

/// Syntactic check plus at least two domain labels (`a@b` is rejected).
fn is_valid_email(email: &str) -> bool {
    let dotted_domain = email
        .rsplit_once('@')
        .map(|(_, domain)| domain.split('.').filter(|label| !label.is_empty()).count() >= 2)
        .unwrap_or(false);

    dotted_domain && email.validate_email()
}
