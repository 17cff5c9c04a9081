//! User identity and profile value types.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port. Invalid
//! input never becomes a domain value.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length of a user name, in characters.
pub const USER_NAME_MAX: usize = 50;

/// Maximum length of an email address, in characters.
pub const EMAIL_MAX: usize = 255;

/// Validation errors raised by the user value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The id is not a valid UUID.
    InvalidId,
    /// The name was missing or blank once trimmed.
    EmptyName,
    /// The name exceeds [`USER_NAME_MAX`] characters.
    NameTooLong {
        /// Permitted maximum.
        max: usize,
    },
    /// The email was missing or blank once trimmed.
    EmptyEmail,
    /// The email exceeds [`EMAIL_MAX`] characters.
    EmailTooLong {
        /// Permitted maximum.
        max: usize,
    },
    /// The email does not look like an address.
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be blank"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "email must not be blank"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Human-readable user name.
///
/// ## Invariants
/// - Non-blank once trimmed; surrounding whitespace is removed.
/// - At most [`USER_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let trimmed = name.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: USER_NAME_MAX });
        }
        Ok(Self(trimmed))
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Length is enforced separately; this shape check mirrors the
        // conventional local@domain.tld address form.
        let pattern = r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address, stored lower-cased.
///
/// ## Invariants
/// - Non-blank, at most [`EMAIL_MAX`] characters.
/// - Matches the conventional `local@domain.tld` shape.
/// - Lower-cased on construction so uniqueness is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let normalized = email.into().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalized.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&normalized) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A user record as the directory exposes it.
///
/// The password digest never appears here; credential checks happen behind
/// the [`UserDirectory`](crate::domain::ports::UserDirectory) port.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: UserId,
    /// Display name.
    #[schema(value_type = String)]
    pub name: UserName,
    /// Lower-cased unique email address.
    #[schema(value_type = String)]
    pub email: EmailAddress,
    /// Whether this user may destroy accounts.
    pub admin: bool,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyName)]
    #[case("   ", UserValidationError::EmptyName)]
    fn blank_names_are_rejected(#[case] name: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserName::new(name).expect_err("blank name"), expected);
    }

    #[test]
    fn overlong_names_are_rejected() {
        let name = "a".repeat(USER_NAME_MAX + 1);
        assert_eq!(
            UserName::new(name).expect_err("overlong name"),
            UserValidationError::NameTooLong { max: USER_NAME_MAX }
        );
    }

    #[test]
    fn names_are_trimmed() {
        let name = UserName::new("  Ada Lovelace  ").expect("valid name");
        assert_eq!(name.as_str(), "Ada Lovelace");
    }

    #[rstest]
    #[case("user@example.com")]
    #[case("USER@foo.COM")]
    #[case("A_US-ER@foo.bar.org")]
    #[case("first.last@foo.jp")]
    #[case("alice+bob@bax.cn")]
    fn conventional_addresses_are_accepted(#[case] email: &str) {
        assert!(EmailAddress::new(email).is_ok());
    }

    #[rstest]
    #[case("user@example,com")]
    #[case("user_at_foo.org")]
    #[case("example.user@foo.")]
    #[case("foo@bar_baz.com com")]
    #[case("")]
    fn malformed_addresses_are_rejected(#[case] email: &str) {
        assert!(EmailAddress::new(email).is_err());
    }

    #[test]
    fn emails_are_lower_cased() {
        let email = EmailAddress::new("Foo@ExAMPle.CoM").expect("valid email");
        assert_eq!(email.as_str(), "foo@example.com");
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    fn malformed_ids_are_rejected(#[case] id: &str) {
        assert_eq!(
            UserId::parse(id).expect_err("invalid id"),
            UserValidationError::InvalidId
        );
    }

    #[test]
    fn ids_round_trip_through_display() {
        let id = UserId::random();
        let parsed = UserId::parse(id.to_string()).expect("round trip");
        assert_eq!(parsed, id);
    }
}
