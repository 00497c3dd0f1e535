//! Demo account seeding.
//!
//! Creates `demo@healthcue.com` with five sample entries spread over the last
//! five days and a welcome alert. Does nothing if the account already exists.

use chrono::{DateTime, Duration, Utc};
use healthcue_api::auth::hash_password;
use healthcue_core::{
  alert::NewAlert,
  entry::JournalEntry,
  sentiment::Scorer,
  store::WellnessStore,
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::{Error, Result};

pub const DEMO_EMAIL: &str = "demo@healthcue.com";
pub const DEMO_USERNAME: &str = "healthUser";
pub const DEMO_PASSWORD: &str = "demo123";

/// Oldest first; entry `i` is backdated `4 - i` days.
pub const SAMPLE_ENTRIES: [&str; 5] = [
  "Feeling great today! Completed my morning run and feeling energized.",
  "Bit stressed about the upcoming project deadline. Need to manage time better.",
  "Wonderful day with family. We had a picnic in the park.",
  "Not feeling my best today. Woke up with a headache.",
  "Productive work session! Finally solved that tricky coding problem.",
];

/// Seed the demo account. Returns the new user, or `None` if it already
/// existed.
pub async fn seed_demo<S>(store: &S, scorer: &Scorer, now: DateTime<Utc>) -> Result<Option<User>>
where
  S: WellnessStore,
{
  let store_err = |e: S::Error| Error::Store(Box::new(e));

  if store
    .find_user_by_email(DEMO_EMAIL)
    .await
    .map_err(store_err)?
    .is_some()
  {
    tracing::debug!(email = DEMO_EMAIL, "demo user already present");
    return Ok(None);
  }

  let password_hash = tokio::task::spawn_blocking(|| hash_password(DEMO_PASSWORD))
    .await
    .map_err(|e| Error::Hash(e.to_string()))?
    .map_err(|e| Error::Hash(e.to_string()))?;

  let Some(user) = store
    .create_user(NewUser {
      username: DEMO_USERNAME.to_owned(),
      email: DEMO_EMAIL.to_owned(),
      password_hash,
    })
    .await
    .map_err(store_err)?
  else {
    tracing::debug!(email = DEMO_EMAIL, "demo user created concurrently");
    return Ok(None);
  };

  let last = SAMPLE_ENTRIES.len() as i64 - 1;
  for (i, content) in SAMPLE_ENTRIES.iter().enumerate() {
    let score = scorer.score(content);
    store
      .save_entry(JournalEntry {
        entry_id:        Uuid::new_v4(),
        user_id:         user.user_id,
        content:         (*content).to_owned(),
        sentiment_label: score.label,
        sentiment_score: score.compound,
        created_at:      now - Duration::days(last - i as i64),
      })
      .await
      .map_err(store_err)?;
  }

  store
    .save_alert(NewAlert::welcome(user.user_id))
    .await
    .map_err(store_err)?;

  tracing::info!(
    user_id = %user.user_id,
    email = DEMO_EMAIL,
    entries = SAMPLE_ENTRIES.len(),
    "demo user created"
  );
  Ok(Some(user))
}
