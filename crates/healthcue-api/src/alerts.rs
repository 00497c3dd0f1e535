//! Handlers for `/api/v1/alerts`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/v1/alerts` | Optional `?unread_only=true` |
//! | `POST` | `/api/v1/alerts/{id}/read` | 404 if missing or owned by someone else |

use axum::{
  Json,
  extract::{Path, Query, State},
  response::IntoResponse,
};
use healthcue_core::{
  alert::{AlertType, HealthAlert, Severity},
  entry::DISPLAY_TIME_FORMAT,
  store::WellnessStore,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, CurrentUser, error::ApiError};

#[derive(Debug, Clone, Serialize)]
pub struct AlertView {
  pub id:          Uuid,
  pub alert_type:  AlertType,
  pub message:     String,
  pub severity:    Severity,
  pub is_read:     bool,
  pub created_at:  String,
  pub resolved_at: Option<String>,
}

impl From<&HealthAlert> for AlertView {
  fn from(alert: &HealthAlert) -> Self {
    Self {
      id:          alert.alert_id,
      alert_type:  alert.alert_type,
      message:     alert.message.clone(),
      severity:    alert.severity,
      is_read:     alert.is_read,
      created_at:  alert.created_at.format(DISPLAY_TIME_FORMAT).to_string(),
      resolved_at: alert
        .resolved_at
        .map(|at| at.format(DISPLAY_TIME_FORMAT).to_string()),
    }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub unread_only: bool,
}

/// `GET /api/v1/alerts[?unread_only=true]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + Clone + 'static,
{
  let alerts = state
    .store
    .list_alerts(user.user_id, params.unread_only)
    .await
    .map_err(ApiError::store)?;
  let alerts: Vec<AlertView> = alerts.iter().map(AlertView::from).collect();
  Ok(Json(json!({ "alerts": alerts })))
}

// ─── Mark read ────────────────────────────────────────────────────────────────

/// `POST /api/v1/alerts/{id}/read`
pub async fn mark_read<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + Clone + 'static,
{
  let updated = state
    .store
    .mark_alert_read(user.user_id, id)
    .await
    .map_err(ApiError::store)?;
  if !updated {
    return Err(ApiError::NotFound("Alert not found".into()));
  }
  Ok(Json(json!({ "success": true })))
}
