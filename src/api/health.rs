use crate::api::schemas::health::HealthResponse;
use axum::{Json, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn healthcheck() -> impl IntoResponse {
    Json(HealthResponse { status: "SERVING".to_string() })
}
