use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::app::dto::HealthResponse;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Fallback for any unmatched path.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Cette route n'existe pas" })),
    )
}
