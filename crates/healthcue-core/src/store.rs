//! The `WellnessStore` trait.
//!
//! Implemented by storage backends (e.g. `healthcue-store-sqlite`). The alert
//! engine, the submission pipeline and the API layer depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  alert::{AlertType, HealthAlert, NewAlert},
  emotion::{EmotionCapture, NewEmotionCapture},
  entry::{JournalEntry, SentimentLabel},
  user::{NewUser, User},
};

/// Abstraction over a HealthCue store backend.
///
/// Journal entries are append-only. Alerts are never deleted; they are only
/// marked read or resolved.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait WellnessStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create-if-absent: persist a new user unless the username or email is
  /// already taken, in which case `None` is returned.
  ///
  /// Implementations must make the uniqueness check and the insert atomic.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn find_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Journal entries ───────────────────────────────────────────────────

  /// Persist a fully-scored entry and return its id.
  fn save_entry(
    &self,
    entry: JournalEntry,
  ) -> impl Future<Output = Result<Uuid, Self::Error>> + Send + '_;

  /// Entries for `user_id`, newest first, optionally restricted to those
  /// created at or after `since`.
  fn entries_for_user(
    &self,
    user_id: Uuid,
    since: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<Vec<JournalEntry>, Self::Error>> + Send + '_;

  /// Count entries for `user_id` created at or after `since` with `label`.
  fn count_entries(
    &self,
    user_id: Uuid,
    since: DateTime<Utc>,
    label: SentimentLabel,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Alerts ────────────────────────────────────────────────────────────

  /// The open (unresolved) alert of `alert_type` for `user_id`, if any.
  fn find_open_alert(
    &self,
    user_id: Uuid,
    alert_type: AlertType,
  ) -> impl Future<Output = Result<Option<HealthAlert>, Self::Error>> + Send + '_;

  /// Persist an alert unconditionally.
  fn save_alert(
    &self,
    input: NewAlert,
  ) -> impl Future<Output = Result<HealthAlert, Self::Error>> + Send + '_;

  /// Create-if-absent: persist the alert only when no open alert of the same
  /// type exists for the user. Returns `None` when one already exists.
  ///
  /// Implementations must make the check and the insert atomic.
  fn save_alert_if_absent(
    &self,
    input: NewAlert,
  ) -> impl Future<Output = Result<Option<HealthAlert>, Self::Error>> + Send + '_;

  /// End the open episode of `alert_type` for `user_id`. Returns `false` if
  /// no alert was open.
  fn resolve_open_alert(
    &self,
    user_id: Uuid,
    alert_type: AlertType,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Mark an alert read. Returns `false` if the alert does not exist or
  /// belongs to another user.
  fn mark_alert_read(
    &self,
    user_id: Uuid,
    alert_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Alerts for `user_id`, newest first.
  fn list_alerts(
    &self,
    user_id: Uuid,
    unread_only: bool,
  ) -> impl Future<Output = Result<Vec<HealthAlert>, Self::Error>> + Send + '_;

  // ── Emotion captures ──────────────────────────────────────────────────

  fn save_emotion(
    &self,
    input: NewEmotionCapture,
  ) -> impl Future<Output = Result<EmotionCapture, Self::Error>> + Send + '_;

  /// The most recent `limit` captures for `user_id`, newest first.
  fn list_emotions(
    &self,
    user_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<EmotionCapture>, Self::Error>> + Send + '_;
}
