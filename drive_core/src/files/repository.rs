use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::error::{AppError, Result};
use super::kind::FileKind;
use super::models::{FileRecord, NewFileRecord};

#[async_trait]
pub trait FileRecordStore: Send + Sync {
    /// Creates a record with `marked_for_deletion = false` and a fresh id.
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<FileRecord>>;
    /// Every record owned by the organization, marked ones included.
    async fn list_by_organization(&self, organization_id: &str) -> Result<Vec<FileRecord>>;
    /// One-way flag; marking an already marked record succeeds.
    async fn mark_for_deletion(&self, id: Uuid) -> Result<()>;
}

#[derive(Clone)]
pub struct SqliteFileRepository {
    pool: SqlitePool,
}

impl SqliteFileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, name, organization_id, storage_ref, kind, marked_for_deletion, created_at FROM files";

fn row_to_record(row: &SqliteRow) -> Result<FileRecord> {
    Ok(FileRecord {
        id: Uuid::parse_str(&row.try_get::<String, _>("id")?)
            .map_err(|e| AppError::Infrastructure(format!("Invalid stored UUID: {}", e)))?,
        name: row.try_get("name")?,
        organization_id: row.try_get("organization_id")?,
        storage_ref: row.try_get("storage_ref")?,
        kind: row.try_get::<String, _>("kind")?.parse::<FileKind>()?,
        marked_for_deletion: row.try_get::<bool, _>("marked_for_deletion")?,
        created_at: DateTime::parse_from_rfc3339(&row.try_get::<String, _>("created_at")?)
            .map_err(|e| AppError::Infrastructure(format!("Invalid stored datetime: {}", e)))?
            .with_timezone(&Utc),
    })
}

#[async_trait]
impl FileRecordStore for SqliteFileRepository {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        if record.organization_id.trim().is_empty() {
            return Err(AppError::IdentityResolution);
        }

        let record = record.into_record(Uuid::new_v4(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO files (id, name, organization_id, storage_ref, kind, marked_for_deletion, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.name)
        .bind(&record.organization_id)
        .bind(&record.storage_ref)
        .bind(record.kind.as_str())
        .bind(record.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true))
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        let row = sqlx::query(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn list_by_organization(&self, organization_id: &str) -> Result<Vec<FileRecord>> {
        let rows = sqlx::query(&format!(
            "{} WHERE organization_id = ?1 ORDER BY created_at ASC, id ASC",
            SELECT_COLUMNS
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect()
    }

    async fn mark_for_deletion(&self, id: Uuid) -> Result<()> {
        let rows_affected = sqlx::query("UPDATE files SET marked_for_deletion = 1 WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("File {} not found", id)));
        }

        Ok(())
    }
}
