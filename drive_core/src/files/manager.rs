use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use super::identity::owner_id;
use super::kind::classify;
use super::models::{CreateFileRequest, FileRecord, NewFileRecord};
use super::repository::FileRecordStore;
use super::uploads::{UploadTarget, UploadTargetIssuer};
use super::validation::validate_create_request;

/// Drives the two-phase upload protocol and deletion marking.
///
/// Holds no per-call state; every operation is a single request/response
/// against the store. Nothing is retried here.
#[derive(Clone)]
pub struct FileLifecycleManager {
    store: Arc<dyn FileRecordStore>,
    issuer: UploadTargetIssuer,
}

impl FileLifecycleManager {
    pub fn new(store: Arc<dyn FileRecordStore>, issuer: UploadTargetIssuer) -> Self {
        Self { store, issuer }
    }

    pub fn with_default_issuer(store: Arc<dyn FileRecordStore>) -> Self {
        Self::new(store, UploadTargetIssuer::default())
    }

    pub fn issue_upload_target(&self) -> UploadTarget {
        let target = self.issuer.issue();
        debug!(token = %target.token, "Issued upload target");
        target
    }

    /// Records a completed transfer. Validates the report, classifies the
    /// content type, then writes the record; any failure leaves no record.
    pub async fn create_file(&self, request: CreateFileRequest) -> Result<FileRecord> {
        validate_create_request(&request).inspect_err(|e| {
            warn!(error = %e, "Rejected file report");
        })?;

        let kind = classify(&request.content_type).inspect_err(|_| {
            warn!(content_type = %request.content_type, "Rejected unsupported content type");
        })?;

        let organization_id = owner_id(request.organization_id.as_deref())
            .map(str::to_string)
            .ok_or(AppError::IdentityResolution)
            .inspect_err(|_| warn!("Rejected file report without owner identity"))?;

        let record = self
            .store
            .insert(NewFileRecord {
                name: request.name,
                organization_id,
                storage_ref: request.storage_ref,
                kind,
            })
            .await?;

        info!(
            file_id = %record.id,
            organization_id = %record.organization_id,
            kind = %record.kind,
            "File recorded"
        );

        Ok(record)
    }

    pub async fn list_files(&self, organization_id: &str) -> Result<Vec<FileRecord>> {
        let organization_id = owner_id(Some(organization_id)).ok_or(AppError::IdentityResolution)?;

        self.store.list_by_organization(organization_id).await
    }

    pub async fn get_file(&self, id: Uuid) -> Result<FileRecord> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))
    }

    /// Flags the record for the external sweep. Never erases anything.
    pub async fn request_deletion(&self, id: Uuid) -> Result<()> {
        self.store.mark_for_deletion(id).await?;
        info!(file_id = %id, "File marked for deletion");
        Ok(())
    }
}
