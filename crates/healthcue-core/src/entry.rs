//! Journal entries: immutable, scored free-text records owned by one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

/// Compound scores at or above this value are labelled [`SentimentLabel::Positive`].
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound scores at or below this value are labelled [`SentimentLabel::Negative`].
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Display format for timestamps in API payloads and chart series.
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// ─── Label ───────────────────────────────────────────────────────────────────

/// Three-way polarity label derived from a compound score.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
pub enum SentimentLabel {
  Positive,
  Negative,
  Neutral,
}

impl SentimentLabel {
  /// Label a compound score using the fixed thresholds.
  pub fn from_score(compound: f64) -> Self {
    if compound >= POSITIVE_THRESHOLD {
      Self::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
      Self::Negative
    } else {
      Self::Neutral
    }
  }

  /// Parse the stored column representation (`"Positive"`, ...).
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownLabel(s.to_owned()))
  }
}

// ─── Entry ───────────────────────────────────────────────────────────────────

/// A persisted journal entry. Nothing about it changes after creation; the
/// score and label are computed on submission, never accepted from callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
  pub entry_id:        Uuid,
  pub user_id:         Uuid,
  pub content:         String,
  pub sentiment_label: SentimentLabel,
  /// Compound score in `[-1, 1]`, stored at full precision.
  pub sentiment_score: f64,
  pub created_at:      DateTime<Utc>,
}

impl JournalEntry {
  /// The score as presented to clients, rounded to three decimals.
  pub fn display_score(&self) -> f64 { round_to(self.sentiment_score, 3) }

  pub fn display_time(&self) -> String {
    self.created_at.format(DISPLAY_TIME_FORMAT).to_string()
  }
}

/// Round `value` to `places` decimal digits.
pub fn round_to(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round() / factor
}

/// Reject blank entry text before it reaches the scorer.
pub fn validate_content(content: &str) -> Result<()> {
  if content.trim().is_empty() {
    return Err(Error::Validation("content must not be empty".into()));
  }
  Ok(())
}
