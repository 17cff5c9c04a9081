//! Password credential handling.
//!
//! Plaintext passwords are validated into [`Password`] values that zeroize
//! on drop, then hashed into opaque Argon2id PHC strings ([`PasswordDigest`])
//! before anything touches a port. The plaintext never persists and never
//! appears in serialised output.

use std::fmt;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use zeroize::Zeroizing;

/// Minimum password length, in characters.
pub const PASSWORD_MIN: usize = 6;

/// Validation errors raised when accepting a plaintext password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// The password was empty.
    #[error("password must not be blank")]
    Empty,
    /// The password is shorter than [`PASSWORD_MIN`] characters.
    #[error("password must be at least {PASSWORD_MIN} characters")]
    TooShort,
    /// The confirmation did not match the password.
    #[error("password confirmation does not match")]
    ConfirmationMismatch,
    /// Salting or hashing failed.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Underlying failure description.
        message: String,
    },
}

/// Validated plaintext password awaiting hashing.
///
/// Holds the plaintext in a zeroizing buffer; no `Display`, `Serialize`, or
/// logging surface exists for this type.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a plaintext password against its confirmation.
    pub fn try_from_parts(password: &str, confirmation: &str) -> Result<Self, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(PasswordError::TooShort);
        }
        if password != confirmation {
            return Err(PasswordError::ConfirmationMismatch);
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(****)")
    }
}

/// Opaque hashed password credential in PHC string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash a validated plaintext password with a fresh random salt.
    pub fn hash(password: &Password) -> Result<Self, PasswordError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes).map_err(|error| PasswordError::Hashing {
            message: error.to_string(),
        })?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|error| PasswordError::Hashing {
            message: error.to_string(),
        })?;
        let phc = Argon2::default()
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|error| PasswordError::Hashing {
                message: error.to_string(),
            })?
            .to_string();
        Ok(Self(phc))
    }

    /// Wrap a PHC string loaded from the store.
    pub const fn from_phc(phc: String) -> Self {
        Self(phc)
    }

    /// Check a candidate plaintext against this digest.
    pub fn verify(&self, candidate: &str) -> bool {
        PasswordHash::new(&self.0)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(candidate.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Borrow the PHC string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
