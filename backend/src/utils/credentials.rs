//! Password hashing and verification for stored user credentials.
//!
//! A credential is a per-user salt plus a bcrypt hash of the salted,
//! peppered password. The pepper is fixed service-wide and never stored
//! next to the credential, so a database dump alone is not enough to mount
//! an offline attack against the hashes.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::{ServiceError, ServiceResult};
use crate::utils::generate_random_string;

/// Service-wide pepper mixed into every password before hashing, alongside
/// the per-credential salt.
const PEPPER: &str = "K#u9!rW~4q";

const SALT_LENGTH: usize = 12;
const MIN_PASSWORD_CHARS: usize = 6;

/// A stored password credential. Never serialized out of the persistence
/// layer.
#[derive(Debug, Clone)]
pub struct Credential {
    pub salt: String,
    pub hash: String,
}

/// One-way codec turning plaintext passwords into stored credentials.
pub struct PasswordCodec;

impl PasswordCodec {
    /// Hashes a new password into a fresh credential.
    ///
    /// Rejects passwords shorter than six characters after trimming
    /// surrounding whitespace. Every call draws a new salt, so hashing the
    /// same password twice yields different credentials.
    pub fn set_password(plaintext: &str) -> ServiceResult<Credential> {
        if plaintext.trim().chars().count() < MIN_PASSWORD_CHARS {
            return Err(ServiceError::WeakPassword);
        }

        let salt = generate_random_string(SALT_LENGTH);

        let hash = hash(format!("{plaintext}{PEPPER}{salt}"), DEFAULT_COST)
            .map_err(|e| ServiceError::internal(format!("password hashing failed: {e}")))?;

        Ok(Credential { salt, hash })
    }

    /// Verifies a plaintext password against a stored credential.
    ///
    /// Recomputes the salted, peppered concatenation and compares through
    /// bcrypt's constant-time check. Neither the plaintext nor the hash is
    /// ever logged.
    pub fn verify(credential: &Credential, plaintext: &str) -> ServiceResult<()> {
        let matches = verify(
            format!("{plaintext}{PEPPER}{}", credential.salt),
            &credential.hash,
        )
        .map_err(|e| ServiceError::internal(format!("password verification failed: {e}")))?;

        if matches {
            Ok(())
        } else {
            Err(ServiceError::InvalidPassword)
        }
    }
}
