//! [`SqliteStore`], the SQLite implementation of [`WellnessStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use healthcue_core::{
  alert::{AlertType, HealthAlert, NewAlert},
  emotion::{EmotionCapture, NewEmotionCapture},
  entry::{JournalEntry, SentimentLabel},
  store::WellnessStore,
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  encode::{RawAlert, RawEmotion, RawEntry, RawUser, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A HealthCue store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a built alert. With `if_absent`, a clash with the open-episode
  /// index is not an error; the insert is skipped and `false` returned.
  async fn insert_alert(&self, alert: &HealthAlert, if_absent: bool) -> Result<bool> {
    let alert_id_str = encode_uuid(alert.alert_id);
    let user_id_str  = encode_uuid(alert.user_id);
    let type_str     = alert.alert_type.as_ref().to_owned();
    let message      = alert.message.clone();
    let severity_str = alert.severity.as_ref().to_owned();
    let is_read      = alert.is_read;
    let at_str       = encode_dt(alert.created_at);

    let sql = if if_absent {
      "INSERT INTO health_alerts (
         alert_id, user_id, alert_type, message, severity, is_read, created_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
       ON CONFLICT DO NOTHING"
    } else {
      "INSERT INTO health_alerts (
         alert_id, user_id, alert_type, message, severity, is_read, created_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
    };

    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          sql,
          rusqlite::params![
            alert_id_str,
            user_id_str,
            type_str,
            message,
            severity_str,
            is_read,
            at_str,
          ],
        )?;
        Ok(n == 1)
      })
      .await?;
    Ok(inserted)
  }

  async fn find_user_where(&self, column: &'static str, value: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM users WHERE {column} = ?1", RawUser::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

fn build_alert(input: NewAlert) -> HealthAlert {
  HealthAlert {
    alert_id:    Uuid::new_v4(),
    user_id:     input.user_id,
    alert_type:  input.alert_type,
    message:     input.message,
    severity:    input.severity,
    is_read:     false,
    created_at:  Utc::now(),
    resolved_at: None,
  }
}

// ─── WellnessStore impl ──────────────────────────────────────────────────────

impl WellnessStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let user = User {
      user_id:       Uuid::new_v4(),
      username:      input.username,
      email:         input.email,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let username = user.username.clone();
    let email    = user.email.clone();
    let hash     = user.password_hash.clone();
    let at_str   = encode_dt(user.created_at);

    // A clash on either unique column is a no-op, not an error.
    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT INTO users (user_id, username, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT DO NOTHING",
          rusqlite::params![id_str, username, email, hash, at_str],
        )?;
        Ok(n == 1)
      })
      .await?;

    if !inserted {
      tracing::debug!(username = %user.username, "username or email already taken");
      return Ok(None);
    }
    Ok(Some(user))
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    self.find_user_where("user_id", encode_uuid(user_id)).await
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    self.find_user_where("email", email.to_owned()).await
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    self.find_user_where("username", username.to_owned()).await
  }

  // ── Journal entries ───────────────────────────────────────────────────────

  async fn save_entry(&self, entry: JournalEntry) -> Result<Uuid> {
    let entry_id     = entry.entry_id;
    let entry_id_str = encode_uuid(entry.entry_id);
    let user_id_str  = encode_uuid(entry.user_id);
    let label_str    = entry.sentiment_label.as_ref().to_owned();
    let score        = entry.sentiment_score;
    let at_str       = encode_dt(entry.created_at);
    let content      = entry.content;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO journal_entries (
             entry_id, user_id, content, sentiment_label, sentiment_score, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![entry_id_str, user_id_str, content, label_str, score, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry_id)
  }

  async fn entries_for_user(
    &self,
    user_id: Uuid,
    since:   Option<DateTime<Utc>>,
  ) -> Result<Vec<JournalEntry>> {
    let user_id_str = encode_uuid(user_id);
    let since_str   = since.map(encode_dt);

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM journal_entries
           WHERE user_id = ?1 AND (?2 IS NULL OR created_at >= ?2)
           ORDER BY created_at DESC, rowid DESC",
          RawEntry::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str, since_str], RawEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn count_entries(
    &self,
    user_id: Uuid,
    since:   DateTime<Utc>,
    label:   SentimentLabel,
  ) -> Result<usize> {
    let user_id_str = encode_uuid(user_id);
    let since_str   = encode_dt(since);
    let label_str   = label.as_ref().to_owned();

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM journal_entries
           WHERE user_id = ?1 AND created_at >= ?2 AND sentiment_label = ?3",
          rusqlite::params![user_id_str, since_str, label_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    usize::try_from(count).map_err(|_| Error::OutOfRange(format!("entry count {count}")))
  }

  // ── Alerts ────────────────────────────────────────────────────────────────

  async fn find_open_alert(
    &self,
    user_id:    Uuid,
    alert_type: AlertType,
  ) -> Result<Option<HealthAlert>> {
    let user_id_str = encode_uuid(user_id);
    let type_str    = alert_type.as_ref().to_owned();

    let raw: Option<RawAlert> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM health_alerts
           WHERE user_id = ?1 AND alert_type = ?2 AND resolved_at IS NULL
           ORDER BY created_at DESC LIMIT 1",
          RawAlert::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![user_id_str, type_str], RawAlert::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAlert::into_alert).transpose()
  }

  async fn save_alert(&self, input: NewAlert) -> Result<HealthAlert> {
    let alert = build_alert(input);
    self.insert_alert(&alert, false).await?;
    Ok(alert)
  }

  async fn save_alert_if_absent(&self, input: NewAlert) -> Result<Option<HealthAlert>> {
    let alert = build_alert(input);
    if self.insert_alert(&alert, true).await? {
      Ok(Some(alert))
    } else {
      tracing::debug!(user_id = %alert.user_id, alert_type = %alert.alert_type, "open alert already exists");
      Ok(None)
    }
  }

  async fn resolve_open_alert(
    &self,
    user_id:    Uuid,
    alert_type: AlertType,
    at:         DateTime<Utc>,
  ) -> Result<bool> {
    let user_id_str = encode_uuid(user_id);
    let type_str    = alert_type.as_ref().to_owned();
    let at_str      = encode_dt(at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE health_alerts SET resolved_at = ?3
           WHERE user_id = ?1 AND alert_type = ?2 AND resolved_at IS NULL",
          rusqlite::params![user_id_str, type_str, at_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn mark_alert_read(&self, user_id: Uuid, alert_id: Uuid) -> Result<bool> {
    let user_id_str  = encode_uuid(user_id);
    let alert_id_str = encode_uuid(alert_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE health_alerts SET is_read = 1 WHERE alert_id = ?1 AND user_id = ?2",
          rusqlite::params![alert_id_str, user_id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn list_alerts(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<HealthAlert>> {
    let user_id_str = encode_uuid(user_id);

    let raws: Vec<RawAlert> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM health_alerts
           WHERE user_id = ?1 AND (?2 = 0 OR is_read = 0)
           ORDER BY created_at DESC, rowid DESC",
          RawAlert::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str, unread_only], RawAlert::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAlert::into_alert).collect()
  }

  // ── Emotion captures ──────────────────────────────────────────────────────

  async fn save_emotion(&self, input: NewEmotionCapture) -> Result<EmotionCapture> {
    let capture = EmotionCapture {
      capture_id: Uuid::new_v4(),
      user_id:    input.user_id,
      emotion:    input.emotion,
      confidence: input.confidence,
      created_at: Utc::now(),
    };

    let id_str      = encode_uuid(capture.capture_id);
    let user_id_str = encode_uuid(capture.user_id);
    let emotion     = capture.emotion.clone();
    let confidence  = capture.confidence;
    let at_str      = encode_dt(capture.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO emotion_captures (capture_id, user_id, emotion, confidence, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, user_id_str, emotion, confidence, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(capture)
  }

  async fn list_emotions(&self, user_id: Uuid, limit: usize) -> Result<Vec<EmotionCapture>> {
    let user_id_str = encode_uuid(user_id);
    let limit_val   = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawEmotion> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM emotion_captures
           WHERE user_id = ?1
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?2",
          RawEmotion::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str, limit_val], RawEmotion::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEmotion::into_capture).collect()
  }
}
