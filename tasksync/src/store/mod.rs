// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! SQLite persistence for users, the role catalog, groups, lists and items.
//!
//! Every repository method is defined on [`SqliteStore`]. Writes spanning
//! more than one row run inside a single transaction; reads exclude
//! tombstoned rows.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction, migrate};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::DomainResult;

mod catalog;
mod groups;
mod lists;
pub mod rows;
mod users;

pub use catalog::CatalogSeed;
pub use groups::MappingUpsert;
pub use rows::*;

pub type Pool = SqlitePool;

#[derive(Debug)]
pub enum StoreInitError {
    Connect(sqlx::Error),
    Migrate(sqlx::migrate::MigrateError),
    InvalidUrl(String),
}

impl fmt::Display for StoreInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreInitError::Connect(err) => write!(f, "Database connection failed: {}", err),
            StoreInitError::Migrate(err) => write!(f, "Database migration failed: {}", err),
            StoreInitError::InvalidUrl(msg) => write!(f, "Invalid database url: {}", msg),
        }
    }
}

impl std::error::Error for StoreInitError {}

impl From<sqlx::Error> for StoreInitError {
    fn from(err: sqlx::Error) -> Self {
        StoreInitError::Connect(err)
    }
}

impl From<sqlx::migrate::MigrateError> for StoreInitError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreInitError::Migrate(err)
    }
}

/// SQLite-backed store shared by every domain service.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: Pool,
}

impl SqliteStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create the database if needed, open the pool and apply migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreInitError> {
        if !is_memory_url(&config.url) {
            create_database(&config.url).await?;
        }
        let pool = connection_pool(config).await?;
        run_pending_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    /// Private in-memory database with migrations applied.
    ///
    /// Every connection to `sqlite::memory:` opens a fresh database, so the
    /// pool is pinned to one long-lived connection.
    pub async fn open_in_memory() -> Result<Self, StoreInitError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        run_pending_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub(crate) async fn begin(&self) -> DomainResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Create the database if it doesn't already exist.
pub async fn create_database(url: &str) -> Result<(), StoreInitError> {
    if !Sqlite::database_exists(url).await? {
        Sqlite::create_database(url).await?;
        log::info!("Created database {}", url);
    }
    Ok(())
}

/// Create a connection pool with foreign keys enforced and bounded waits.
pub async fn connection_pool(config: &DatabaseConfig) -> Result<Pool, StoreInitError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|err| StoreInitError::InvalidUrl(err.to_string()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_seconds));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Run any pending database migrations from inside the application.
pub async fn run_pending_migrations(pool: &Pool) -> Result<(), StoreInitError> {
    migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}
