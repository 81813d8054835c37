//! Password hashing and verification using Argon2id.

use argon2::password_hash::Error as ArgonError;
use argon2::password_hash::phc::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::rngs::SysRng;

use crate::handler::{ClientError, ErrorKind, Result};
use crate::utility::tracing_targets::TRACING_TARGET_PASSWORD_HASHER;

/// Message attached to failed credential checks.
const WRONG_CREDENTIALS: &str = "login/password incorrect";

/// Argon2id password hashing service.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a new instance of the [`PasswordHasher`] service.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// The returned PHC string embeds the algorithm, parameters and salt.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::InternalServerError` if salt generation or
    /// hashing fails.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::try_from_rng(&mut SysRng).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_PASSWORD_HASHER,
                error = %e,
                "failed to generate password salt"
            );

            ErrorKind::InternalServerError.with_context("Salt generation error")
        })?;

        let password_hash = self
            .argon2
            .hash_password_with_salt(password.as_bytes(), salt.to_salt().as_ref())
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    error = %e,
                    "password hashing failed"
                );

                ErrorKind::InternalServerError.with_context("Hash generation error")
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// - `user.wrong` (422) with `login` and `password` fields for an
    ///   incorrect password
    /// - `ErrorKind::InternalServerError` for an unreadable hash
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET_PASSWORD_HASHER,
                error = %e,
                "stored password hash is malformed"
            );

            ErrorKind::InternalServerError.with_context("Hash format error")
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(()),
            Err(ArgonError::PasswordInvalid) => {
                tracing::debug!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    "password verification failed"
                );

                Err(Self::wrong_credentials())
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    error = %e,
                    "password verification system error"
                );

                Err(ErrorKind::InternalServerError.with_context("Verification error"))
            }
        }
    }

    /// Hashes and verifies a random password so that lookups of unknown
    /// accounts take as long as real verifications.
    pub fn verify_dummy_password(&self, password: &str) {
        let dummy_password = super::generate_verification_token();

        if let Ok(dummy_hash) = self.hash_password(&dummy_password) {
            let _ = self.verify_password(password, &dummy_hash);
        }
    }

    /// Returns the `user.wrong` error used for every failed credential check.
    pub fn wrong_credentials() -> crate::handler::Error<'static> {
        ClientError::UserWrong
            .with_field("login", WRONG_CREDENTIALS)
            .with_field("password", WRONG_CREDENTIALS)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("secure_password_123")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("secure_password_123", &hash).is_ok());
        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();

        let hash1 = hasher.hash_password("test_password")?;
        let hash2 = hasher.hash_password("test_password")?;

        assert_ne!(hash1, hash2);
        Ok(())
    }

    #[test]
    fn wrong_password_is_user_wrong() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("correct_password")?;

        let Err(error) = hasher.verify_password("wrong_password", &hash) else {
            anyhow::bail!("wrong password verified");
        };
        assert_eq!(error.kind(), ErrorKind::Unprocessable);
        assert_eq!(error.message(), Some("user.wrong"));
        assert_eq!(error.fields().len(), 2);
        Ok(())
    }

    #[test]
    fn invalid_hash_is_internal_error() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify_password("test_password", "invalid_hash_format");
        assert!(matches!(result, Err(e) if e.kind() == ErrorKind::InternalServerError));
    }
}
