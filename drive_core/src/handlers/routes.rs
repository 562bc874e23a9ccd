//! Route table for the file service

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::AppState;
use super::{files, health};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::handle_health))
        .route("/api/uploads", post(files::issue_upload_target))
        .route("/api/files", get(files::list_files).post(files::create_file))
        .route("/api/files/:id", delete(files::request_deletion))
}
