//! Liveness probe.

use axum::Json;
use serde_json::{Value, json};

pub(in crate::http) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
