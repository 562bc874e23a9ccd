use sqlx::{SqlitePool, Row};
use tracing::{info, error};
use crate::error::{AppError, Result};

pub struct MigrationManager {
    pool: SqlitePool,
}

struct Migration {
    version: i64,
    name: &'static str,
    checksum: &'static str,
    sql_statements: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_files_table",
        checksum: "files_v1",
        sql_statements: &[
            r#"
            CREATE TABLE files (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                organization_id TEXT NOT NULL CHECK (organization_id <> ''),
                storage_ref TEXT NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('image', 'pdf', 'csv')),
                marked_for_deletion INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            "#,
            "CREATE INDEX idx_files_organization_id ON files(organization_id, created_at)",
            "CREATE INDEX idx_files_marked_for_deletion ON files(marked_for_deletion) WHERE marked_for_deletion = 1",
        ],
    },
];

impl MigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Starting database migrations");

        self.create_migrations_table().await?;

        let current_version = self.get_current_version().await?;
        info!("Current migration version: {}", current_version);

        let mut applied_count = 0;

        for migration in MIGRATIONS {
            if migration.version > current_version {
                info!("Applying migration {}: {}", migration.version, migration.name);
                self.apply_migration(migration).await?;
                applied_count += 1;
            }
        }

        if applied_count > 0 {
            info!("Applied {} migrations successfully", applied_count);
        } else {
            info!("No new migrations to apply");
        }

        Ok(())
    }

    async fn create_migrations_table(&self) -> Result<()> {
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                checksum TEXT NOT NULL
            )
        "#)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    pub async fn get_current_version(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COALESCE(MAX(version), 0) as version FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        row.try_get("version").map_err(AppError::from)
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        for statement in migration.sql_statements {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to execute migration statement: {}", e);
                    AppError::from(e)
                })?;
        }

        sqlx::query(r#"
            INSERT INTO _migrations (version, name, checksum)
            VALUES (?, ?, ?)
        "#)
        .bind(migration.version)
        .bind(migration.name)
        .bind(migration.checksum)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(())
    }
}

pub async fn run_migrations(pool: SqlitePool) -> Result<()> {
    MigrationManager::new(pool).run_migrations().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::get_database_pool;
    use tempfile::TempDir;

    async fn create_test_pool(dir: &TempDir) -> SqlitePool {
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("drive.db").display());
        get_database_pool(&DatabaseConfig::for_url(url)).await.unwrap()
    }

    #[tokio::test]
    async fn test_migrations_create_files_table() {
        let dir = TempDir::new().unwrap();
        let pool = create_test_pool(&dir).await;

        run_migrations(pool.clone()).await.unwrap();

        let tables: Vec<String> = sqlx::query("SELECT name FROM sqlite_master WHERE type='table'")
            .fetch_all(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.get::<String, _>("name"))
            .collect();

        assert!(tables.contains(&"files".to_string()));
        assert!(tables.contains(&"_migrations".to_string()));
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let dir = TempDir::new().unwrap();
        let pool = create_test_pool(&dir).await;

        let manager = MigrationManager::new(pool);
        manager.run_migrations().await.unwrap();
        manager.run_migrations().await.unwrap();

        assert_eq!(manager.get_current_version().await.unwrap(), 1);
    }
}
