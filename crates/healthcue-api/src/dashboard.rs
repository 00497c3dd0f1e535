//! `GET /api/v1/dashboard/stats`.
//!
//! Normally computed live from the caller's entries. Two substitutions keep
//! the dashboard renderable, and `source` says which one applied:
//!
//! - `onboarding`: the user has no entries yet, so a canned sample is shown.
//! - `fallback`: the store failed; the failure is logged and the sample shown.

use axum::{Json, extract::State};
use chrono::{DateTime, Duration, Utc};
use healthcue_core::{
  aggregate::{ChartPoint, DashboardStats, aggregate},
  entry::{JournalEntry, SentimentLabel},
  store::WellnessStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiState, CurrentUser, alerts::AlertView};

/// Unread alerts shown on the dashboard.
pub const DASHBOARD_ALERTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
  Live,
  Onboarding,
  Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
  pub total_entries:    usize,
  pub positive_entries: usize,
  pub negative_entries: usize,
  pub neutral_entries:  usize,
  pub mood_score:       f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
  pub stats:      StatsView,
  pub chart_data: Vec<ChartPoint>,
  pub alerts:     Vec<AlertView>,
  pub source:     Source,
}

impl DashboardView {
  fn new(stats: DashboardStats, alerts: Vec<AlertView>, source: Source) -> Self {
    Self {
      stats: StatsView {
        total_entries:    stats.total,
        positive_entries: stats.positive_count,
        negative_entries: stats.negative_count,
        neutral_entries:  stats.neutral_count,
        mood_score:       stats.mood_score,
      },
      chart_data: stats.chart_series,
      alerts,
      source,
    }
  }
}

// (days ago, score) for the canned sample.
const SAMPLE: [(i64, f64); 5] = [
  (4, 0.8316),
  (3, -0.2023),
  (2, 0.5719),
  (1, 0.0),
  (0, 0.6588),
];

fn sample_entries(now: DateTime<Utc>) -> Vec<JournalEntry> {
  SAMPLE
    .iter()
    .map(|&(days, score)| JournalEntry {
      entry_id:        Uuid::nil(),
      user_id:         Uuid::nil(),
      content:         String::new(),
      sentiment_label: SentimentLabel::from_score(score),
      sentiment_score: score,
      created_at:      now - Duration::days(days),
    })
    .collect()
}

fn sample_stats(now: DateTime<Utc>) -> DashboardStats { aggregate(&sample_entries(now)) }

async fn live<S>(store: &S, user_id: Uuid) -> Result<DashboardView, S::Error>
where
  S: WellnessStore,
{
  let entries = store.entries_for_user(user_id, None).await?;
  let alerts: Vec<AlertView> = store
    .list_alerts(user_id, true)
    .await?
    .iter()
    .take(DASHBOARD_ALERTS)
    .map(AlertView::from)
    .collect();

  if entries.is_empty() {
    return Ok(DashboardView::new(sample_stats(Utc::now()), alerts, Source::Onboarding));
  }
  Ok(DashboardView::new(aggregate(&entries), alerts, Source::Live))
}

/// `GET /api/v1/dashboard/stats`. Never fails once authenticated.
pub async fn stats<S>(
  State(state): State<ApiState<S>>,
  user: CurrentUser,
) -> Json<DashboardView>
where
  S: WellnessStore + Clone + 'static,
{
  match live(state.store.as_ref(), user.user_id).await {
    Ok(view) => Json(view),
    Err(e) => {
      tracing::error!(user_id = %user.user_id, error = %e, "dashboard query failed, serving sample");
      Json(DashboardView::new(sample_stats(Utc::now()), Vec::new(), Source::Fallback))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sample_is_consistent() {
    let now = Utc::now();
    let stats = sample_stats(now);
    assert_eq!(stats.total, 5);
    assert_eq!(stats.positive_count, 3);
    assert_eq!(stats.negative_count, 1);
    assert_eq!(stats.neutral_count, 1);
    assert_eq!(stats.mood_score, 60.0);
    assert_eq!(stats.chart_series.len(), 5);
    assert_eq!(stats.chart_series[0].score, 0.8316);
  }

  #[test]
  fn source_serialises_lowercase() {
    assert_eq!(serde_json::to_string(&Source::Onboarding).unwrap(), "\"onboarding\"");
  }
}
