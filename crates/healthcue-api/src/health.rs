//! `GET /api/health`: unauthenticated liveness probe.

use axum::Json;
use chrono::Utc;
use serde_json::{Value, json};

pub async fn handler() -> Json<Value> {
  Json(json!({
    "status": "healthy",
    "message": "HealthCue API is running!",
    "timestamp": Utc::now().to_rfc3339(),
  }))
}
