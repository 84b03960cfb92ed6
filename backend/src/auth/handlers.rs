//! Handler functions for authentication endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use sqlx::PgPool;

use crate::api::common::{HttpError, body_rejection_to_http, service_error_to_http};
use crate::auth::models::{LoginRequest, LoginResponse};
use crate::auth::service::AuthService;
use crate::utils::jwt::TokenManager;

/// Handles a login request, returning a bearer token on success.
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenManager>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, HttpError> {
    let Json(request) = payload.map_err(body_rejection_to_http)?;

    let service = AuthService::new(&pool, &tokens);
    let response = service.login(request).await.map_err(service_error_to_http)?;

    Ok(Json(response))
}
