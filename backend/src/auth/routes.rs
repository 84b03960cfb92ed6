//! Defines the HTTP routes for authentication.

use axum::{Router, routing::post};

use crate::auth::handlers::login;

/// Creates the authentication router
pub fn auth_router() -> Router {
    Router::new().route("/login", post(login))
}
