use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::kind::FileKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    pub name: String,
    pub organization_id: String,
    pub storage_ref: String,
    pub kind: FileKind,
    pub marked_for_deletion: bool,
    pub created_at: DateTime<Utc>,
}

/// Store input for a record that has passed classification.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub name: String,
    pub organization_id: String,
    pub storage_ref: String,
    pub kind: FileKind,
}

impl NewFileRecord {
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> FileRecord {
        FileRecord {
            id,
            name: self.name,
            organization_id: self.organization_id,
            storage_ref: self.storage_ref,
            kind: self.kind,
            marked_for_deletion: false,
            created_at,
        }
    }
}

/// Completion report sent once the binary transfer has produced a storage ref.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFileRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    #[serde(default)]
    pub organization_id: Option<String>,

    #[validate(length(min = 1, message = "Storage reference is required"))]
    pub storage_ref: String,

    pub content_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileListQuery {
    pub organization_id: Option<String>,
}
