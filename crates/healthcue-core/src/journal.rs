//! Entry submission: validate, score, persist, then re-evaluate alerts.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  engine::{AlertEngine, Evaluation},
  entry::{JournalEntry, validate_content},
  sentiment::Scorer,
  store::WellnessStore,
};

/// Why a submission was not saved. Alerting failures never show up here.
#[derive(Debug, Error)]
pub enum SubmitError<E>
where
  E: std::error::Error + 'static,
{
  #[error(transparent)]
  Invalid(#[from] crate::Error),

  #[error("store error: {0}")]
  Store(#[source] E),
}

/// A saved entry plus what the alert engine made of it. `alert` is `None`
/// when the post-save evaluation failed (and was logged).
#[derive(Debug, Clone)]
pub struct Submission {
  pub entry: JournalEntry,
  pub alert: Option<Evaluation>,
}

/// Score and persist `content` for `user_id`, then run the alert engine.
///
/// The entry is committed before the engine runs; nothing the engine does can
/// undo it.
pub async fn submit_entry<S>(
  store: &S,
  scorer: &Scorer,
  engine: &AlertEngine,
  user_id: Uuid,
  content: &str,
  now: DateTime<Utc>,
) -> Result<Submission, SubmitError<S::Error>>
where
  S: WellnessStore,
{
  validate_content(content)?;

  let score = scorer.score(content);
  let entry = JournalEntry {
    entry_id: Uuid::new_v4(),
    user_id,
    content: content.to_owned(),
    sentiment_label: score.label,
    sentiment_score: score.compound,
    created_at: now,
  };

  store
    .save_entry(entry.clone())
    .await
    .map_err(SubmitError::Store)?;

  let alert = engine.evaluate(store, user_id, now).await;
  Ok(Submission { entry, alert })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    alert::AlertType,
    engine::tests::MemoryStore,
    entry::SentimentLabel,
  };

  #[tokio::test]
  async fn blank_content_is_rejected_before_storage() {
    let store = MemoryStore::default();
    let err = submit_entry(
      &store,
      &Scorer::new(),
      &AlertEngine::new(),
      Uuid::new_v4(),
      "   ",
      Utc::now(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SubmitError::Invalid(crate::Error::Validation(_))));
    assert!(store.entries.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn submission_scores_and_persists() {
    let store = MemoryStore::default();
    let user = Uuid::new_v4();
    let sub = submit_entry(
      &store,
      &Scorer::new(),
      &AlertEngine::new(),
      user,
      "Wonderful day with family.",
      Utc::now(),
    )
    .await
    .unwrap();

    assert_eq!(sub.entry.sentiment_label, SentimentLabel::Positive);
    assert!(sub.entry.sentiment_score > 0.05);
    assert_eq!(sub.alert, Some(Evaluation::Quiescent { negatives: 0 }));

    let stored = store.entries_for_user(user, None).await.unwrap();
    assert_eq!(stored, vec![sub.entry]);
  }

  #[tokio::test]
  async fn third_negative_submission_raises_one_alert() {
    let store = MemoryStore::default();
    let scorer = Scorer::new();
    let engine = AlertEngine::new();
    let user = Uuid::new_v4();
    let texts = [
      "I feel sad and hopeless today.",
      "Terrible day, everything went wrong.",
      "So stressed and exhausted.",
      "Awful night, feeling miserable and lonely.",
    ];

    let mut outcomes = Vec::new();
    for text in texts {
      let sub = submit_entry(&store, &scorer, &engine, user, text, Utc::now())
        .await
        .unwrap();
      assert_eq!(sub.entry.sentiment_label, SentimentLabel::Negative, "{text}");
      outcomes.push(sub.alert.unwrap());
    }

    assert!(matches!(outcomes[2], Evaluation::Triggered(_)));
    assert_eq!(outcomes[3], Evaluation::AlreadyOpen { negatives: 4 });
    let open = store
      .find_open_alert(user, AlertType::NegativePattern)
      .await
      .unwrap();
    assert!(open.is_some());
    assert_eq!(store.alerts.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn alerting_failure_does_not_fail_submission() {
    let store = MemoryStore { fail_counts: true, ..Default::default() };
    let sub = submit_entry(
      &store,
      &Scorer::new(),
      &AlertEngine::new(),
      Uuid::new_v4(),
      "Terrible day.",
      Utc::now(),
    )
    .await
    .unwrap();
    assert!(sub.alert.is_none());
    assert_eq!(store.entries.lock().unwrap().len(), 1);
  }
}
