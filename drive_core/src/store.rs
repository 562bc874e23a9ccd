//! In-memory file record store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::files::{FileRecord, FileRecordStore, NewFileRecord};

#[derive(Default)]
struct Tables {
    files: HashMap<Uuid, FileRecord>,
    by_organization: HashMap<String, Vec<Uuid>>,
}

/// Process-local store, selected when the database URL is `memory`.
#[derive(Clone, Default)]
pub struct MemoryFileStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.read().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FileRecordStore for MemoryFileStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        if record.organization_id.trim().is_empty() {
            return Err(AppError::IdentityResolution);
        }

        let record = record.into_record(Uuid::new_v4(), Utc::now());

        let mut tables = self.tables.write();
        tables
            .by_organization
            .entry(record.organization_id.clone())
            .or_default()
            .push(record.id);
        tables.files.insert(record.id, record.clone());

        Ok(record)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        Ok(self.tables.read().files.get(&id).cloned())
    }

    async fn list_by_organization(&self, organization_id: &str) -> Result<Vec<FileRecord>> {
        let tables = self.tables.read();

        let files: Vec<FileRecord> = tables
            .by_organization
            .get(organization_id)
            .map(|ids| ids.iter().filter_map(|id| tables.files.get(id).cloned()).collect())
            .unwrap_or_default();

        Ok(files)
    }

    async fn mark_for_deletion(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.write();

        let record = tables
            .files
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))?;

        record.marked_for_deletion = true;
        Ok(())
    }
}
