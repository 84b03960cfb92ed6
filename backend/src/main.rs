//! Main entry point for the userhub backend.
//!
//! This file initializes the Axum web server, sets up the database
//! connection, and wires all API routes into the request instrumentation
//! chain before serving.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod middleware;
mod repositories;
mod services;
mod utils;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{Extension, Router};
use tracing::info;
use tracing_subscriber::fmt::init;

use crate::config::Config;
use crate::database::Database;
use crate::middleware::{Instrumentation, instrument};
use crate::utils::jwt::TokenManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    let pool = db.pool().clone();

    let tokens = Arc::new(TokenManager::new(config.jwt_secret.as_deref()));
    let instrumentation =
        Arc::new(Instrumentation::new().context("failed to build metrics registry")?);

    let app = Router::new()
        .merge(api::user::routes::user_router())
        .merge(auth::routes::auth_router())
        .merge(api::system::routes::system_router());

    let app = instrument(app, instrumentation.clone())
        .layer(Extension(pool))
        .layer(Extension(tokens))
        .layer(Extension(instrumentation));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Starting userhub server on port {}", config.server_port);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
