use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// GET /healthz — liveness probe, always healthy.
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "Healthy!" })))
}
