//! Health check handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::warn;

use crate::AppState;

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let mut health_info = json!({
        "status": "healthy",
        "app": state.app_name,
        "version": state.version,
        "store": if state.db_manager.is_some() { "sqlite" } else { "memory" },
        "timestamp": chrono::Utc::now().timestamp(),
    });

    let mut status_code = StatusCode::OK;

    if let Some(db_manager) = &state.db_manager {
        if let Err(e) = db_manager.health_check().await {
            warn!("Database health check failed: {}", e);
            health_info["status"] = serde_json::Value::String("unhealthy".to_string());
            status_code = StatusCode::SERVICE_UNAVAILABLE;
        }
    }

    (status_code, Json(health_info))
}
