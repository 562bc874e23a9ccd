pub mod identity;
pub mod kind;
pub mod manager;
pub mod models;
pub mod repository;
pub mod uploads;
pub mod validation;

pub use identity::{owner_id, resolve_owner};
pub use kind::{classify, FileKind};
pub use manager::FileLifecycleManager;
pub use models::{CreateFileRequest, FileListQuery, FileRecord, NewFileRecord};
pub use repository::{FileRecordStore, SqliteFileRepository};
pub use uploads::{UploadTarget, UploadTargetIssuer};
pub use validation::validate_create_request;
