//! Emotion captures: passive records of a client-side emotion detection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionCapture {
  pub capture_id: Uuid,
  pub user_id:    Uuid,
  pub emotion:    String,
  pub confidence: f64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEmotionCapture {
  pub user_id:    Uuid,
  pub emotion:    String,
  pub confidence: f64,
}

impl NewEmotionCapture {
  /// Trim the label and check the confidence lies in `[0, 1]`.
  pub fn validated(user_id: Uuid, emotion: &str, confidence: f64) -> Result<Self> {
    let emotion = emotion.trim();
    if emotion.is_empty() {
      return Err(Error::Validation("emotion must not be empty".into()));
    }
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
      return Err(Error::Validation(format!(
        "confidence must be between 0 and 1, got {confidence}"
      )));
    }
    Ok(Self { user_id, emotion: emotion.to_owned(), confidence })
  }
}
