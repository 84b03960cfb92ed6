//! User business logic service.
//!
//! Handles validation, credential creation, and CRUD orchestration over
//! the user repository.

use sqlx::PgPool;

use crate::database::models::{CreateUserRequest, NewUser, UpdateUserRequest, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::services::validate_request;
use crate::utils::credentials::PasswordCodec;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a PgPool,
}

impl<'a> UserService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new user, hashing the supplied password into a stored
    /// credential.
    ///
    /// # Errors
    /// Returns `ServiceError` for validation failures, a too-short
    /// password, or repository failures.
    pub async fn create_user(&self, request: CreateUserRequest) -> ServiceResult<i64> {
        validate_request(&request)?;

        let credential = PasswordCodec::set_password(&request.password)?;

        let repo = UserRepository::new(self.pool);
        let id = repo
            .create(NewUser {
                username: request.username,
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                phone: request.phone,
                salt: credential.salt,
                password_hash: credential.hash,
            })
            .await?;

        tracing::info!("user created - id {id}");
        Ok(id)
    }

    /// Retrieves a user by id.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if no row matches.
    pub async fn get_user_required(&self, id: i64) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        repo.get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))
    }

    /// Applies a partial profile update to an existing user.
    pub async fn update_user(&self, id: i64, changes: UpdateUserRequest) -> ServiceResult<()> {
        validate_request(&changes)?;

        // Surface a 404 for unknown ids instead of silently updating
        // nothing.
        self.get_user_required(id).await?;

        let repo = UserRepository::new(self.pool);
        repo.update(id, &changes).await?;

        Ok(())
    }

    pub async fn delete_user(&self, id: i64) -> ServiceResult<()> {
        let repo = UserRepository::new(self.pool);
        repo.delete(id).await?;
        Ok(())
    }
}
