//! Handlers for operational endpoints: health checking and metrics
//! scraping. Both paths sit on the instrumentation chain's excluded list,
//! so probes and scrapes do not feed back into the metrics they read.

use std::sync::Arc;

use axum::extract::Extension;
use axum::response::Json;
use serde_json::{Value, json};
use sqlx::PgPool;

use crate::api::common::{HttpError, service_error_to_http};
use crate::errors::ServiceError;
use crate::middleware::Instrumentation;
use crate::repositories::user_repository::UserRepository;

/// Reports whether the service can reach its database.
#[axum::debug_handler]
pub async fn health(Extension(pool): Extension<PgPool>) -> Result<Json<Value>, HttpError> {
    let repo = UserRepository::new(&pool);
    repo.ping()
        .await
        .map_err(|e| service_error_to_http(ServiceError::Database { source: e }))?;

    Ok(Json(json!({ "status": "ok" })))
}

/// Renders the Prometheus text exposition for the chain's registry.
#[axum::debug_handler]
pub async fn metrics(
    Extension(instrumentation): Extension<Arc<Instrumentation>>,
) -> Result<String, HttpError> {
    instrumentation.metrics().render().map_err(|e| {
        service_error_to_http(ServiceError::internal(format!(
            "metrics encoding failed: {e}"
        )))
    })
}
