//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so that lexical order matches chronological order.
//! UUIDs are stored as hyphenated lowercase strings; enums as their
//! `AsRef<str>` forms.

use chrono::{DateTime, SecondsFormat, Utc};
use healthcue_core::{
  alert::{AlertType, HealthAlert, Severity},
  emotion::EmotionCapture,
  entry::{JournalEntry, SentimentLabel},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub const COLUMNS: &'static str = "user_id, username, email, password_hash, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `journal_entries` row.
pub struct RawEntry {
  pub entry_id:        String,
  pub user_id:         String,
  pub content:         String,
  pub sentiment_label: String,
  pub sentiment_score: f64,
  pub created_at:      String,
}

impl RawEntry {
  pub const COLUMNS: &'static str =
    "entry_id, user_id, content, sentiment_label, sentiment_score, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:        row.get(0)?,
      user_id:         row.get(1)?,
      content:         row.get(2)?,
      sentiment_label: row.get(3)?,
      sentiment_score: row.get(4)?,
      created_at:      row.get(5)?,
    })
  }

  pub fn into_entry(self) -> Result<JournalEntry> {
    Ok(JournalEntry {
      entry_id:        decode_uuid(&self.entry_id)?,
      user_id:         decode_uuid(&self.user_id)?,
      content:         self.content,
      sentiment_label: SentimentLabel::parse(&self.sentiment_label)?,
      sentiment_score: self.sentiment_score,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `health_alerts` row.
pub struct RawAlert {
  pub alert_id:    String,
  pub user_id:     String,
  pub alert_type:  String,
  pub message:     String,
  pub severity:    String,
  pub is_read:     bool,
  pub created_at:  String,
  pub resolved_at: Option<String>,
}

impl RawAlert {
  pub const COLUMNS: &'static str =
    "alert_id, user_id, alert_type, message, severity, is_read, created_at, resolved_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      alert_id:    row.get(0)?,
      user_id:     row.get(1)?,
      alert_type:  row.get(2)?,
      message:     row.get(3)?,
      severity:    row.get(4)?,
      is_read:     row.get(5)?,
      created_at:  row.get(6)?,
      resolved_at: row.get(7)?,
    })
  }

  pub fn into_alert(self) -> Result<HealthAlert> {
    Ok(HealthAlert {
      alert_id:    decode_uuid(&self.alert_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      alert_type:  AlertType::parse(&self.alert_type)?,
      message:     self.message,
      severity:    Severity::parse(&self.severity)?,
      is_read:     self.is_read,
      created_at:  decode_dt(&self.created_at)?,
      resolved_at: self.resolved_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw values read directly from an `emotion_captures` row.
pub struct RawEmotion {
  pub capture_id: String,
  pub user_id:    String,
  pub emotion:    String,
  pub confidence: f64,
  pub created_at: String,
}

impl RawEmotion {
  pub const COLUMNS: &'static str = "capture_id, user_id, emotion, confidence, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      capture_id: row.get(0)?,
      user_id:    row.get(1)?,
      emotion:    row.get(2)?,
      confidence: row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_capture(self) -> Result<EmotionCapture> {
    Ok(EmotionCapture {
      capture_id: decode_uuid(&self.capture_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      emotion:    self.emotion,
      confidence: self.confidence,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_sortable() {
    let a = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let b = a + chrono::Duration::microseconds(1);
    assert_eq!(encode_dt(a), "2024-01-02T03:04:05.000000Z");
    assert_eq!(encode_dt(a).len(), encode_dt(b).len());
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn bad_timestamp_is_a_date_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
