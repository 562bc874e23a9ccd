use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    Row, SqlitePool,
};
use std::{str::FromStr, time::Duration};
use tracing::{info, error};
use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let row = sqlx::query("SELECT 1 as test")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database health check failed: {}", e);
                AppError::from(e)
            })?;

        let test_value: i32 = row.try_get("test")
            .map_err(AppError::from)?;

        if test_value == 1 {
            Ok(())
        } else {
            Err(AppError::Infrastructure("unexpected health check result".to_string()))
        }
    }
}

const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn get_database_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    info!("Connecting to database: {}", config.url);

    // Applied to every connection the pool opens.
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(AppError::from)?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .test_before_acquire(true)
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to create database pool: {}", e);
            AppError::from(e)
        })?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_connection() {
        let temp_dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}?mode=rwc", temp_dir.path().join("drive.db").display());

        let pool = get_database_pool(&DatabaseConfig::for_url(url)).await.unwrap();
        let db_manager = DatabaseManager::new(pool);

        db_manager.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_pragmas_apply_to_every_pooled_connection() {
        let temp_dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}?mode=rwc", temp_dir.path().join("drive.db").display());

        let mut config = DatabaseConfig::for_url(url);
        config.min_connections = 3;
        config.max_connections = 3;
        let pool = get_database_pool(&config).await.unwrap();

        let mut connections = Vec::new();
        for _ in 0..3 {
            connections.push(pool.acquire().await.unwrap());
        }

        for conn in connections.iter_mut() {
            let busy_timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
                .fetch_one(&mut **conn)
                .await
                .unwrap();
            assert_eq!(busy_timeout, 30_000);

            let foreign_keys: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
                .fetch_one(&mut **conn)
                .await
                .unwrap();
            assert_eq!(foreign_keys, 1);

            let journal_mode: String = sqlx::query_scalar("PRAGMA journal_mode")
                .fetch_one(&mut **conn)
                .await
                .unwrap();
            assert_eq!(journal_mode, "wal");
        }
    }

    #[tokio::test]
    async fn test_unreachable_database_is_infrastructure_error() {
        let temp_dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}", temp_dir.path().join("missing/drive.db").display());

        let mut config = DatabaseConfig::for_url(url);
        config.acquire_timeout_seconds = 1;

        let err = get_database_pool(&config).await.unwrap_err();
        assert_eq!(err.code(), "infrastructure");
    }
}
