//! Health alerts raised for a user, either by the alert engine or by seeding.
//!
//! Alerts are never deleted. The only mutations are marking an alert read and
//! resolving an open episode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

/// What raised the alert. Stored as the snake_case form.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertType {
  Welcome,
  NegativePattern,
}

impl AlertType {
  /// Episodic types allow at most one open alert per user.
  pub fn is_episodic(self) -> bool { matches!(self, Self::NegativePattern) }

  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownAlertType(s.to_owned()))
  }
}

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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
  Info,
  Medium,
  High,
}

impl Severity {
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownSeverity(s.to_owned()))
  }
}

/// A persisted alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAlert {
  pub alert_id:    Uuid,
  pub user_id:     Uuid,
  pub alert_type:  AlertType,
  pub message:     String,
  pub severity:    Severity,
  pub is_read:     bool,
  pub created_at:  DateTime<Utc>,
  /// Set when the episode this alert belongs to has ended.
  pub resolved_at: Option<DateTime<Utc>>,
}

impl HealthAlert {
  pub fn is_open(&self) -> bool { self.resolved_at.is_none() }
}

/// Input to [`crate::store::WellnessStore::save_alert`]. The id and
/// `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAlert {
  pub user_id:    Uuid,
  pub alert_type: AlertType,
  pub message:    String,
  pub severity:   Severity,
}

impl NewAlert {
  pub fn welcome(user_id: Uuid) -> Self {
    Self {
      user_id,
      alert_type: AlertType::Welcome,
      message: "Welcome to HealthCue! Start tracking your wellness journey."
        .into(),
      severity: Severity::Info,
    }
  }

  pub fn negative_pattern(user_id: Uuid, negatives: usize) -> Self {
    Self {
      user_id,
      alert_type: AlertType::NegativePattern,
      message: format!(
        "We noticed {negatives} negative entries in the last week. Consider \
         relaxation or talking to someone."
      ),
      severity: Severity::Medium,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn alert_type_string_forms() {
    assert_eq!(AlertType::NegativePattern.as_ref(), "negative_pattern");
    assert_eq!(AlertType::parse("welcome").unwrap(), AlertType::Welcome);
    assert!(AlertType::parse("panic").is_err());
    assert_eq!(AlertType::NegativePattern.to_string(), "negative_pattern");
  }

  #[test]
  fn severity_string_forms() {
    assert_eq!(Severity::Medium.as_ref(), "medium");
    assert_eq!(Severity::parse("high").unwrap(), Severity::High);
    assert!(matches!(Severity::parse("urgent"), Err(Error::UnknownSeverity(_))));
  }

  #[test]
  fn negative_pattern_message_embeds_count() {
    let alert = NewAlert::negative_pattern(Uuid::new_v4(), 4);
    assert!(alert.message.starts_with("We noticed 4 negative entries"));
    assert_eq!(alert.severity, Severity::Medium);
    assert!(alert.alert_type.is_episodic());
    assert!(!AlertType::Welcome.is_episodic());
  }
}
