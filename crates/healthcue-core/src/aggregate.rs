//! Dashboard statistics, a read-side projection over a user's entries.

use serde::{Deserialize, Serialize};

use crate::entry::{JournalEntry, SentimentLabel, round_to};

/// Number of recent entries plotted in the mood chart.
pub const CHART_POINTS: usize = 10;

/// One plotted entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
  /// `YYYY-MM-DD HH:MM`.
  pub date:  String,
  pub score: f64,
  pub label: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub total:          usize,
  pub positive_count: usize,
  pub negative_count: usize,
  pub neutral_count:  usize,
  /// Percentage of entries labelled positive, two decimals; 0 when empty.
  pub mood_score:     f64,
  /// The most recent [`CHART_POINTS`] entries, oldest first.
  pub chart_series:   Vec<ChartPoint>,
}

/// Summarise `entries`. Input order does not matter.
pub fn aggregate(entries: &[JournalEntry]) -> DashboardStats {
  let count = |label| entries.iter().filter(|e| e.sentiment_label == label).count();

  let total = entries.len();
  let positive_count = count(SentimentLabel::Positive);
  let negative_count = count(SentimentLabel::Negative);
  let neutral_count = count(SentimentLabel::Neutral);

  let mood_score = if total == 0 {
    0.0
  } else {
    round_to(positive_count as f64 / total as f64 * 100.0, 2)
  };

  let mut ordered: Vec<&JournalEntry> = entries.iter().collect();
  ordered.sort_by_key(|e| e.created_at);
  let skip = ordered.len().saturating_sub(CHART_POINTS);
  let chart_series = ordered
    .into_iter()
    .skip(skip)
    .map(|e| ChartPoint {
      date:  e.display_time(),
      score: e.sentiment_score,
      label: e.sentiment_label,
    })
    .collect();

  DashboardStats {
    total,
    positive_count,
    negative_count,
    neutral_count,
    mood_score,
    chart_series,
  }
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Duration, TimeZone, Utc};
  use uuid::Uuid;

  use super::*;

  fn base() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap() }

  fn entry(label: SentimentLabel, score: f64, minutes: i64) -> JournalEntry {
    JournalEntry {
      entry_id: Uuid::new_v4(),
      user_id: Uuid::nil(),
      content: String::new(),
      sentiment_label: label,
      sentiment_score: score,
      created_at: base() + Duration::minutes(minutes),
    }
  }

  #[test]
  fn empty_input_has_zero_mood_score() {
    let stats = aggregate(&[]);
    assert_eq!(stats.total, 0);
    assert_eq!(stats.mood_score, 0.0);
    assert!(stats.chart_series.is_empty());
  }

  #[test]
  fn mood_score_rounds_to_two_places() {
    let stats = aggregate(&[
      entry(SentimentLabel::Positive, 0.6, 0),
      entry(SentimentLabel::Positive, 0.4, 1),
      entry(SentimentLabel::Negative, -0.5, 2),
    ]);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.positive_count, 2);
    assert_eq!(stats.negative_count, 1);
    assert_eq!(stats.neutral_count, 0);
    assert_eq!(stats.mood_score, 66.67);
  }

  #[test]
  fn chart_keeps_latest_ten_oldest_first() {
    // Newest first, the way the store hands them back.
    let entries: Vec<_> = (0..14)
      .rev()
      .map(|m| entry(SentimentLabel::Neutral, m as f64 / 100.0, m))
      .collect();

    let stats = aggregate(&entries);
    assert_eq!(stats.total, 14);
    assert_eq!(stats.chart_series.len(), CHART_POINTS);
    assert_eq!(stats.chart_series[0].score, 0.04);
    assert_eq!(stats.chart_series[9].score, 0.13);
    assert_eq!(stats.chart_series[0].date, "2024-05-01 08:34");
    assert!(
      stats
        .chart_series
        .windows(2)
        .all(|w| w[0].date <= w[1].date)
    );
  }

  #[test]
  fn chart_keeps_raw_scores() {
    let stats = aggregate(&[entry(SentimentLabel::Positive, 0.57194, 0)]);
    assert_eq!(stats.chart_series[0].score, 0.57194);
    assert_eq!(stats.chart_series[0].label, SentimentLabel::Positive);
    assert_eq!(stats.mood_score, 100.0);
  }
}
