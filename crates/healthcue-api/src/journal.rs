//! Handlers for `/api/v1/journal/entries`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/v1/journal/entries` | Newest first |
//! | `POST` | `/api/v1/journal/entries` | Body: `{"content":"..."}`; 201 |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use healthcue_core::{
  entry::{JournalEntry, SentimentLabel},
  journal::{SubmitError, submit_entry},
  store::WellnessStore,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, CurrentUser, error::ApiError};

/// An entry as presented to clients: rounded score, minute-precision time.
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
  pub id:              Uuid,
  pub content:         String,
  pub sentiment_label: SentimentLabel,
  pub sentiment_score: f64,
  pub created_at:      String,
}

impl From<&JournalEntry> for EntryView {
  fn from(entry: &JournalEntry) -> Self {
    Self {
      id:              entry.entry_id,
      content:         entry.content.clone(),
      sentiment_label: entry.sentiment_label,
      sentiment_score: entry.display_score(),
      created_at:      entry.display_time(),
    }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/v1/journal/entries`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + Clone + 'static,
{
  let entries = state
    .store
    .entries_for_user(user.user_id, None)
    .await
    .map_err(ApiError::store)?;
  let entries: Vec<EntryView> = entries.iter().map(EntryView::from).collect();
  Ok(Json(json!({ "entries": entries })))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(default)]
  pub content: Option<String>,
}

/// `POST /api/v1/journal/entries`, body: `{"content":"..."}`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + Clone + 'static,
{
  let content = body.content.unwrap_or_default();
  let submission = submit_entry(
    state.store.as_ref(),
    &state.scorer,
    &state.engine,
    user.user_id,
    &content,
    Utc::now(),
  )
  .await
  .map_err(|e| match e {
    SubmitError::Invalid(e) => ApiError::BadRequest(e.to_string()),
    SubmitError::Store(e) => ApiError::store(e),
  })?;

  tracing::info!(
    user_id = %user.user_id,
    entry_id = %submission.entry.entry_id,
    label = %submission.entry.sentiment_label,
    "journal entry created"
  );

  Ok((
    StatusCode::CREATED,
    Json(json!({
      "message": "Journal entry created successfully",
      "entry": EntryView::from(&submission.entry),
    })),
  ))
}
