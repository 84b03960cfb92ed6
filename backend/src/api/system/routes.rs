//! Defines the operational HTTP routes.

use axum::{Router, routing::get};

use super::handlers::{health, metrics};

pub fn system_router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
}
