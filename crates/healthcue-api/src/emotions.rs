//! Handlers for `/api/v1/emotion/*`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/v1/emotion/capture` | Body: `{"emotion":"happy","confidence":0.82}`; 201 |
//! | `GET`  | `/api/v1/emotion/history` | Optional `?limit=` (default 20, max 100) |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use healthcue_core::{
  emotion::{EmotionCapture, NewEmotionCapture},
  entry::DISPLAY_TIME_FORMAT,
  store::WellnessStore,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, CurrentUser, error::ApiError};

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct CaptureView {
  pub id:         Uuid,
  pub emotion:    String,
  pub confidence: f64,
  pub created_at: String,
}

impl From<&EmotionCapture> for CaptureView {
  fn from(capture: &EmotionCapture) -> Self {
    Self {
      id:         capture.capture_id,
      emotion:    capture.emotion.clone(),
      confidence: capture.confidence,
      created_at: capture.created_at.format(DISPLAY_TIME_FORMAT).to_string(),
    }
  }
}

// ─── Capture ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CaptureBody {
  #[serde(default)]
  pub emotion:    Option<String>,
  #[serde(default)]
  pub confidence: Option<f64>,
}

/// `POST /api/v1/emotion/capture`
pub async fn capture<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Json(body): Json<CaptureBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + Clone + 'static,
{
  let input = NewEmotionCapture::validated(
    user.user_id,
    body.emotion.as_deref().unwrap_or_default(),
    body.confidence.unwrap_or(f64::NAN),
  )
  .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let capture = state
    .store
    .save_emotion(input)
    .await
    .map_err(ApiError::store)?;

  Ok((
    StatusCode::CREATED,
    Json(json!({
      "message": "Emotion captured",
      "capture": CaptureView::from(&capture),
    })),
  ))
}

// ─── History ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub limit: Option<usize>,
}

/// `GET /api/v1/emotion/history[?limit=<n>]`
pub async fn history<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + Clone + 'static,
{
  let limit = params
    .limit
    .unwrap_or(DEFAULT_HISTORY_LIMIT)
    .min(MAX_HISTORY_LIMIT);
  let captures = state
    .store
    .list_emotions(user.user_id, limit)
    .await
    .map_err(ApiError::store)?;
  let captures: Vec<CaptureView> = captures.iter().map(CaptureView::from).collect();
  Ok(Json(json!({ "captures": captures })))
}
