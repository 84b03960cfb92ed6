//! Module for database connection setup.
//!
//! This module is responsible for initializing the Postgres connection pool
//! and applying pending schema migrations at startup.

use crate::config::Config;
use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub mod models;

pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Initializes the connection pool and runs pending migrations.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!().run(&pool).await?;

        Ok(Database { pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
