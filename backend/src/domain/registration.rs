//! Signup and profile-edit input validation.
//!
//! Raw form attributes are validated in full before anything touches a port:
//! every failing field is reported at once so a client can redisplay the
//! form, and only fully validated values reach the directory.

use std::collections::BTreeMap;

use serde::Serialize;

use super::password::{Password, PasswordDigest, PasswordError};
use super::user::{EmailAddress, UserId, UserName, UserValidationError};

/// Per-field validation messages, keyed by the API field name.
///
/// Serialises as a plain object, for example
/// `{"name": ["name must not be blank"]}`. Keys are ordered so payloads are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    /// Record a validation message against a field.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Whether any field failed validation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

fn push_user_error(errors: &mut FieldErrors, error: &UserValidationError) {
    let field = match error {
        UserValidationError::InvalidId => "id",
        UserValidationError::EmptyName | UserValidationError::NameTooLong { .. } => "name",
        UserValidationError::EmptyEmail
        | UserValidationError::EmailTooLong { .. }
        | UserValidationError::InvalidEmail => "email",
    };
    errors.push(field, error.to_string());
}

fn push_password_error(errors: &mut FieldErrors, error: &PasswordError) {
    match error {
        PasswordError::ConfirmationMismatch => {
            errors.push("passwordConfirmation", error.to_string());
        }
        _ => errors.push("password", error.to_string()),
    }
}

/// Raw registration attributes as submitted.
#[derive(Debug, Clone, Default)]
pub struct SignupAttrs {
    /// Requested display name.
    pub name: String,
    /// Requested email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Plaintext password confirmation.
    pub password_confirmation: String,
}

impl SignupAttrs {
    /// Validate every field, reporting all failures at once.
    pub fn validate(&self) -> Result<ValidSignup, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = UserName::new(self.name.clone())
            .map_err(|error| push_user_error(&mut errors, &error))
            .ok();
        let email = EmailAddress::new(self.email.clone())
            .map_err(|error| push_user_error(&mut errors, &error))
            .ok();
        let password = Password::try_from_parts(&self.password, &self.password_confirmation)
            .map_err(|error| push_password_error(&mut errors, &error))
            .ok();

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) if errors.is_empty() => Ok(ValidSignup {
                name,
                email,
                password,
            }),
            _ => Err(errors),
        }
    }
}

/// Fully validated registration input.
#[derive(Debug, Clone)]
pub struct ValidSignup {
    /// Validated display name.
    pub name: UserName,
    /// Validated, lower-cased email.
    pub email: EmailAddress,
    /// Validated plaintext password awaiting hashing.
    pub password: Password,
}

impl ValidSignup {
    /// Hash the password and assemble the record to persist.
    pub fn into_new_user(self) -> Result<NewUser, PasswordError> {
        let digest = PasswordDigest::hash(&self.password)?;
        Ok(NewUser {
            id: UserId::random(),
            name: self.name,
            email: self.email,
            digest,
        })
    }
}

/// A validated user record ready for insertion.
///
/// New users are never admins; the flag is only ever set out of band.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Freshly generated identifier.
    pub id: UserId,
    /// Validated display name.
    pub name: UserName,
    /// Validated, lower-cased email.
    pub email: EmailAddress,
    /// Hashed password credential.
    pub digest: PasswordDigest,
}

/// Raw profile-edit attributes as submitted.
///
/// A blank password means "keep the current credential"; a non-blank one is
/// validated against its confirmation and replaces the stored digest.
#[derive(Debug, Clone, Default)]
pub struct ProfileAttrs {
    /// Requested display name.
    pub name: String,
    /// Requested email address.
    pub email: String,
    /// Replacement plaintext password, when changing it.
    pub password: String,
    /// Confirmation for the replacement password.
    pub password_confirmation: String,
}

impl ProfileAttrs {
    /// Validate every field, reporting all failures at once.
    pub fn validate(&self) -> Result<ValidProfile, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = UserName::new(self.name.clone())
            .map_err(|error| push_user_error(&mut errors, &error))
            .ok();
        let email = EmailAddress::new(self.email.clone())
            .map_err(|error| push_user_error(&mut errors, &error))
            .ok();
        let password = if self.password.is_empty() && self.password_confirmation.is_empty() {
            None
        } else {
            Password::try_from_parts(&self.password, &self.password_confirmation)
                .map_err(|error| push_password_error(&mut errors, &error))
                .ok()
        };

        match (name, email) {
            (Some(name), Some(email)) if errors.is_empty() => Ok(ValidProfile {
                name,
                email,
                password,
            }),
            _ => Err(errors),
        }
    }
}

/// Fully validated profile-edit input.
#[derive(Debug, Clone)]
pub struct ValidProfile {
    /// Validated display name.
    pub name: UserName,
    /// Validated, lower-cased email.
    pub email: EmailAddress,
    /// Replacement password, when one was submitted.
    pub password: Option<Password>,
}

impl ValidProfile {
    /// Hash the replacement password, if any, and assemble the changes.
    pub fn into_changes(self) -> Result<UserChanges, PasswordError> {
        let digest = match self.password {
            Some(ref password) => Some(PasswordDigest::hash(password)?),
            None => None,
        };
        Ok(UserChanges {
            name: self.name,
            email: self.email,
            digest,
        })
    }
}

/// Validated changes to apply to a stored user record.
#[derive(Debug, Clone)]
pub struct UserChanges {
    /// Replacement display name.
    pub name: UserName,
    /// Replacement email address.
    pub email: EmailAddress,
    /// Replacement credential, when the password was changed.
    pub digest: Option<PasswordDigest>,
}
