//! Core business logic for the authentication flow.

use sqlx::PgPool;

use crate::auth::models::{LoginRequest, LoginResponse};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::services::validate_request;
use crate::utils::credentials::PasswordCodec;
use crate::utils::jwt::TokenManager;

/// Authentication service for credential checks and token issuance
pub struct AuthService<'a> {
    pool: &'a PgPool,
    tokens: &'a TokenManager,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a PgPool, tokens: &'a TokenManager) -> Self {
        Self { pool, tokens }
    }

    /// Authenticates the supplied credentials and issues a bearer token
    /// bound to the user's id.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        validate_request(&request)?;

        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_by_email(&request.email)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))?;

        PasswordCodec::verify(&user.credential(), &request.password)?;

        let token = self.tokens.issue(user.id)?;

        Ok(LoginResponse {
            token,
            user_id: user.id,
        })
    }
}
