//! Negative-pattern alert engine.
//!
//! Evaluated after each new entry. Per user, the engine is either
//! *quiescent* (no open `negative_pattern` alert) or *triggered* (one open
//! alert, read or unread). It opens an episode when the trailing window holds
//! at least [`AlertEngine::threshold`] negative entries, and resolves it once
//! an evaluation finds the window below that threshold again. While
//! triggered, re-evaluation never creates another alert.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  alert::{AlertType, HealthAlert, NewAlert},
  entry::SentimentLabel,
  store::WellnessStore,
};

/// What a single evaluation did.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
  /// Below threshold and no episode was open.
  Quiescent { negatives: usize },
  /// Below threshold; the open episode was closed.
  Resolved { negatives: usize },
  /// At or above threshold, but an alert was already open.
  AlreadyOpen { negatives: usize },
  /// A new episode started with this alert.
  Triggered(HealthAlert),
}

#[derive(Debug, Clone, Copy)]
pub struct AlertEngine {
  window:    Duration,
  threshold: usize,
}

impl Default for AlertEngine {
  fn default() -> Self {
    Self { window: Duration::days(7), threshold: 3 }
  }
}

impl AlertEngine {
  pub fn new() -> Self { Self::default() }

  pub fn window(&self) -> Duration { self.window }

  pub fn threshold(&self) -> usize { self.threshold }

  /// Evaluate `user_id` at `now`, propagating store failures.
  pub async fn try_evaluate<S>(
    &self,
    store: &S,
    user_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<Evaluation, S::Error>
  where
    S: WellnessStore,
  {
    let since = now - self.window;
    let negatives = store
      .count_entries(user_id, since, SentimentLabel::Negative)
      .await?;

    if negatives < self.threshold {
      let resolved = store
        .resolve_open_alert(user_id, AlertType::NegativePattern, now)
        .await?;
      if resolved {
        info!(%user_id, negatives, "negative-pattern episode resolved");
        return Ok(Evaluation::Resolved { negatives });
      }
      return Ok(Evaluation::Quiescent { negatives });
    }

    if store
      .find_open_alert(user_id, AlertType::NegativePattern)
      .await?
      .is_some()
    {
      return Ok(Evaluation::AlreadyOpen { negatives });
    }

    // The read above is only a shortcut; the insert itself is create-if-absent.
    match store
      .save_alert_if_absent(NewAlert::negative_pattern(user_id, negatives))
      .await?
    {
      Some(alert) => {
        info!(%user_id, negatives, alert_id = %alert.alert_id, "negative-pattern alert raised");
        Ok(Evaluation::Triggered(alert))
      }
      None => Ok(Evaluation::AlreadyOpen { negatives }),
    }
  }

  /// Best-effort evaluation: failures are logged and swallowed so they can
  /// never affect the entry write that preceded them.
  pub async fn evaluate<S>(
    &self,
    store: &S,
    user_id: Uuid,
    now: DateTime<Utc>,
  ) -> Option<Evaluation>
  where
    S: WellnessStore,
  {
    match self.try_evaluate(store, user_id, now).await {
      Ok(evaluation) => {
        debug!(%user_id, ?evaluation, "alert evaluation");
        Some(evaluation)
      }
      Err(e) => {
        warn!(%user_id, error = %e, "alert check failed");
        None
      }
    }
  }
}
