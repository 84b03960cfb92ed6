//! Bearer token issuance and validation.
//!
//! Tokens are self-contained HS256-signed claim sets; validity is purely a
//! function of the signature and the expiry timestamp, with no server-side
//! token state.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::errors::{ServiceError, ServiceResult};
use crate::utils::generate_random_string;

const ISSUER: &str = "userhub";
const TOKEN_TTL_SECONDS: i64 = 3600;
const GENERATED_SECRET_LENGTH: usize = 16;

/// Claims carried by an issued bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Id of the user the token was issued to.
    pub sub: i64,
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiry timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and validates bearer tokens with a process-wide secret.
///
/// Immutable after construction; `issue` and `validate` are safe to call
/// concurrently from any number of request tasks.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenManager {
    /// Builds a manager from the configured secret.
    ///
    /// Without a configured secret a random one is generated for the
    /// lifetime of the process; tokens issued before a restart then stop
    /// validating. That trade-off is accepted rather than persisting key
    /// material.
    pub fn new(secret: Option<&str>) -> Self {
        let secret = match secret {
            Some(secret) if !secret.is_empty() => secret.to_string(),
            _ => generate_random_string(GENERATED_SECRET_LENGTH),
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);

        TokenManager {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a signed token for the given user, expiring in one hour.
    pub fn issue(&self, user_id: i64) -> ServiceResult<String> {
        self.issue_with_ttl(user_id, Duration::seconds(TOKEN_TTL_SECONDS))
    }

    fn issue_with_ttl(&self, user_id: i64, ttl: Duration) -> ServiceResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal(format!("token signing failed: {e}")))
    }

    /// Validates a token's signature and expiry and returns its claims.
    ///
    /// Every failure mode collapses into `InvalidToken`: callers cannot
    /// tell a forged token from an expired or malformed one. The rejected
    /// detail is only logged locally.
    pub fn validate(&self, token: &str) -> ServiceResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("token rejected: {e}");
                ServiceError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_carries_subject() {
        let manager = TokenManager::new(Some("test-secret"));
        let token = manager.issue(42).unwrap();

        let claims = manager.validate(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
    }

    #[test]
    fn expired_token_rejected() {
        let manager = TokenManager::new(Some("test-secret"));
        let token = manager
            .issue_with_ttl(7, Duration::seconds(-3600))
            .unwrap();

        assert!(matches!(
            manager.validate(&token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn foreign_secret_rejected() {
        let issuing = TokenManager::new(Some("one-secret"));
        let validating = TokenManager::new(Some("another-secret"));

        let token = issuing.issue(9).unwrap();
        assert!(matches!(
            validating.validate(&token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn malformed_token_rejected() {
        let manager = TokenManager::new(Some("test-secret"));
        assert!(matches!(
            manager.validate("not-a-token"),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn generated_secret_still_roundtrips() {
        let manager = TokenManager::new(None);
        let token = manager.issue(1).unwrap();
        assert_eq!(manager.validate(&token).unwrap().sub, 1);
    }
}
