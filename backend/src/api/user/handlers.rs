//! Handler functions for user account endpoints.
//!
//! The read, update, and delete endpoints are gated by the owner guard:
//! the bearer token's subject must match the id in the request path.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Extension, Json, Path};
use axum::http::{HeaderMap, StatusCode};
use sqlx::PgPool;

use crate::api::common::{
    HttpError, body_rejection_to_http, path_rejection_to_http, service_error_to_http,
};
use crate::auth::guard::require_owner;
use crate::database::models::{
    CreateUserRequest, CreatedResponse, UpdateUserRequest, UserResponse,
};
use crate::services::user_service::UserService;
use crate::utils::jwt::TokenManager;

/// Creates a new user account.
#[axum::debug_handler]
pub async fn create_user(
    Extension(pool): Extension<PgPool>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, HttpError> {
    let Json(request) = payload.map_err(body_rejection_to_http)?;

    let service = UserService::new(&pool);
    let id = service
        .create_user(request)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(CreatedResponse { id }))
}

/// Returns a user's profile.
#[axum::debug_handler]
pub async fn get_user(
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenManager>>,
    path: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, HttpError> {
    let Path(id) = path.map_err(path_rejection_to_http)?;
    require_owner(&tokens, &headers, id).map_err(service_error_to_http)?;

    let service = UserService::new(&pool);
    let user = service
        .get_user_required(id)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(UserResponse::from(user)))
}

/// Applies a partial update to a user's profile fields.
#[axum::debug_handler]
pub async fn update_user(
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenManager>>,
    path: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<StatusCode, HttpError> {
    let Path(id) = path.map_err(path_rejection_to_http)?;
    require_owner(&tokens, &headers, id).map_err(service_error_to_http)?;

    let Json(changes) = payload.map_err(body_rejection_to_http)?;

    let service = UserService::new(&pool);
    service
        .update_user(id, changes)
        .await
        .map_err(service_error_to_http)?;

    Ok(StatusCode::OK)
}

/// Deletes a user account.
#[axum::debug_handler]
pub async fn delete_user(
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenManager>>,
    path: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let Path(id) = path.map_err(path_rejection_to_http)?;
    require_owner(&tokens, &headers, id).map_err(service_error_to_http)?;

    let service = UserService::new(&pool);
    service
        .delete_user(id)
        .await
        .map_err(service_error_to_http)?;

    Ok(StatusCode::NO_CONTENT)
}
