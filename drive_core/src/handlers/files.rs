use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    extractors::ApiJson,
    files::{owner_id, resolve_owner, CreateFileRequest, FileListQuery, FileRecord},
    AppState,
};

pub const ORGANIZATION_HEADER: &str = "x-organization-id";
pub const USER_HEADER: &str = "x-user-id";

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<FileRecord>,
    pub count: usize,
}

/// An explicit id in the body or query wins; otherwise the owner is resolved
/// from the caller's identity headers.
fn effective_owner(explicit: Option<String>, headers: &HeaderMap) -> Option<String> {
    owner_id(explicit.as_deref()).map(str::to_string).or_else(|| {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        resolve_owner(header(ORGANIZATION_HEADER), header(USER_HEADER))
    })
}

pub async fn issue_upload_target(State(state): State<AppState>) -> impl IntoResponse {
    let target = state.file_manager.issue_upload_target();
    (StatusCode::CREATED, Json(target))
}

pub async fn create_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(mut request): ApiJson<CreateFileRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /api/files - name: {}, content_type: {}", request.name, request.content_type);

    request.organization_id = effective_owner(request.organization_id.take(), &headers);

    let record = state.file_manager.create_file(request).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FileListQuery>,
) -> Result<Json<FileListResponse>> {
    let organization_id = effective_owner(query.organization_id, &headers)
        .ok_or(AppError::IdentityResolution)?;

    let files = state.file_manager.list_files(&organization_id).await?;

    Ok(Json(FileListResponse {
        count: files.len(),
        files,
    }))
}

pub async fn request_deletion(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse> {
    info!("DELETE /api/files/{}", file_id);

    let id = Uuid::parse_str(&file_id)
        .map_err(|_| AppError::BadRequest(format!("Invalid file id: {}", file_id)))?;

    state.file_manager.request_deletion(id).await?;
    let record = state.file_manager.get_file(id).await?;

    Ok((StatusCode::ACCEPTED, Json(record)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_explicit_owner_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(ORGANIZATION_HEADER, HeaderValue::from_static("org_header"));

        assert_eq!(
            effective_owner(Some("org_body".to_string()), &headers).as_deref(),
            Some("org_body")
        );
    }

    #[test]
    fn test_owner_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_static("user_7"));
        assert_eq!(effective_owner(None, &headers).as_deref(), Some("user_7"));

        headers.insert(ORGANIZATION_HEADER, HeaderValue::from_static("org_42"));
        assert_eq!(effective_owner(Some(String::new()), &headers).as_deref(), Some("org_42"));
    }

    #[test]
    fn test_blank_explicit_owner_falls_back_to_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_static("user_7"));

        assert_eq!(effective_owner(Some("   ".to_string()), &headers).as_deref(), Some("user_7"));
        assert_eq!(effective_owner(Some("   ".to_string()), &HeaderMap::new()), None);
    }

    #[test]
    fn test_no_owner() {
        assert_eq!(effective_owner(None, &HeaderMap::new()), None);
    }
}
