//! Defines the HTTP routes for user accounts.

use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{create_user, delete_user, get_user, update_user};

pub fn user_router() -> Router {
    Router::new()
        .route("/user", post(create_user))
        .route(
            "/user/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
