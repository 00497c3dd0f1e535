//! Lexicon-based polarity scoring.
//!
//! Each token is looked up in a [`Lexicon`], then adjusted for the words
//! around it: intensifiers and hedges in the three preceding tokens, negations
//! in the same window, ALL-CAPS emphasis, and a contrastive "but". The summed
//! valence plus punctuation emphasis is squashed into `[-1, 1]` with
//! `x / sqrt(x² + 15)`.
//!
//! [`Scorer::score`] is pure and total: any UTF-8 input, including an empty
//! string, produces a score.

pub mod lexicon;

use serde::{Deserialize, Serialize};

use crate::entry::{SentimentLabel, round_to};

pub use lexicon::Lexicon;
use lexicon::{booster, is_negation};

/// Added to a valence written in ALL CAPS when the text mixes cases.
const C_INCR: f64 = 0.733;
/// Multiplier applied to a valence preceded by a negation.
const N_SCALAR: f64 = -0.74;
/// Normalisation constant; a raw sum of ~±4 lands near ±0.7.
const ALPHA: f64 = 15.0;

const EXCLAMATION_INCR: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCR: f64 = 0.18;
const QUESTION_MAX: f64 = 0.96;

/// Output of [`Scorer::score`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
  /// Normalised polarity in `[-1, 1]`, rounded to four decimals.
  pub compound: f64,
  /// Always `SentimentLabel::from_score(compound)`.
  pub label:    SentimentLabel,
  /// Share of the text carrying positive valence.
  pub positive: f64,
  pub negative: f64,
  pub neutral:  f64,
}

impl SentimentScore {
  fn empty() -> Self {
    Self {
      compound: 0.0,
      label:    SentimentLabel::Neutral,
      positive: 0.0,
      negative: 0.0,
      neutral:  0.0,
    }
  }
}

// ─── Scorer ──────────────────────────────────────────────────────────────────

/// Stateless text scorer over an owned lexicon.
#[derive(Debug, Clone)]
pub struct Scorer {
  lexicon: Lexicon,
}

impl Default for Scorer {
  fn default() -> Self { Self::new() }
}

impl Scorer {
  /// A scorer over the built-in lexicon.
  pub fn new() -> Self { Self::with_lexicon(Lexicon::builtin()) }

  pub fn with_lexicon(lexicon: Lexicon) -> Self { Self { lexicon } }

  pub fn lexicon(&self) -> &Lexicon { &self.lexicon }

  /// Score `text`.
  pub fn score(&self, text: &str) -> SentimentScore {
    let tokens = self.tokenize(text);
    if tokens.is_empty() {
      return SentimentScore::empty();
    }

    let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    let cap_diff = is_cap_diff(&tokens);

    let mut valences = Vec::with_capacity(tokens.len());
    for (i, lower) in lowered.iter().enumerate() {
      let hedge = lower == "kind" && lowered.get(i + 1).is_some_and(|n| n == "of");
      if booster(lower).is_some() || hedge {
        valences.push(0.0);
        continue;
      }
      valences.push(self.token_valence(i, &tokens, &lowered, cap_diff));
    }

    apply_but(&lowered, &mut valences);

    let emphasis = punctuation_emphasis(text);
    let sum: f64 = valences.iter().sum();
    let compound = if sum > 0.0 {
      normalize(sum + emphasis)
    } else if sum < 0.0 {
      normalize(sum - emphasis)
    } else {
      0.0
    };
    let compound = round_to(compound, 4);

    let (positive, negative, neutral) = proportions(&valences, emphasis);

    SentimentScore {
      compound,
      label: SentimentLabel::from_score(compound),
      positive,
      negative,
      neutral,
    }
  }

  /// Whitespace tokens with surrounding punctuation removed. A token found
  /// verbatim in the lexicon (an emoticon, say) is kept as-is. Tokens of a
  /// single character carry no sentiment and are dropped.
  fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
    text
      .split_whitespace()
      .map(|raw| {
        if self.lexicon.contains(&raw.to_lowercase()) {
          return raw;
        }
        let stripped = raw.trim_matches(|c: char| {
          c.is_ascii_punctuation() || matches!(c, '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}')
        });
        if stripped.is_empty() { raw } else { stripped }
      })
      .filter(|t| t.chars().count() > 1)
      .collect()
  }

  fn token_valence(
    &self,
    i: usize,
    tokens: &[&str],
    lowered: &[String],
    cap_diff: bool,
  ) -> f64 {
    let Some(mut valence) = self.lexicon.valence(&lowered[i]) else {
      return 0.0;
    };

    if cap_diff && is_upper(tokens[i]) {
      if valence > 0.0 {
        valence += C_INCR;
      } else {
        valence -= C_INCR;
      }
    }

    for start in 0..3 {
      if i <= start {
        break;
      }
      let j = i - (start + 1);
      if self.lexicon.contains(&lowered[j]) {
        continue;
      }
      let mut scalar = scalar_inc_dec(tokens[j], &lowered[j], valence, cap_diff);
      match start {
        1 => scalar *= 0.95,
        2 => scalar *= 0.9,
        _ => {}
      }
      valence += scalar;
      valence = negation_check(valence, lowered, start, i);
    }

    valence
  }
}

// ─── Heuristics ──────────────────────────────────────────────────────────────

fn is_upper(token: &str) -> bool {
  token.chars().any(char::is_alphabetic) && !token.chars().any(char::is_lowercase)
}

/// True when some, but not all, tokens are written in ALL CAPS.
fn is_cap_diff(tokens: &[&str]) -> bool {
  let upper = tokens.iter().filter(|t| is_upper(t)).count();
  upper > 0 && upper < tokens.len()
}

fn scalar_inc_dec(raw: &str, lower: &str, valence: f64, cap_diff: bool) -> f64 {
  let Some(mut scalar) = booster(lower) else {
    return 0.0;
  };
  if valence < 0.0 {
    scalar = -scalar;
  }
  if cap_diff && is_upper(raw) {
    if valence > 0.0 {
      scalar += C_INCR;
    } else {
      scalar -= C_INCR;
    }
  }
  scalar
}

fn negation_check(valence: f64, lowered: &[String], start: usize, i: usize) -> f64 {
  let at = move |back: usize| lowered[i - back].as_str();
  let so_or_this = |w: &str| w == "so" || w == "this";

  match start {
    0 if is_negation(at(1)) => valence * N_SCALAR,
    1 => {
      if at(2) == "never" && so_or_this(at(1)) {
        valence * 1.25
      } else if at(2) == "without" && at(1) == "doubt" {
        valence
      } else if is_negation(at(2)) {
        valence * N_SCALAR
      } else {
        valence
      }
    }
    2 => {
      if at(3) == "never" && (so_or_this(at(2)) || so_or_this(at(1))) {
        valence * 1.25
      } else if at(3) == "without" && (at(2) == "doubt" || at(1) == "doubt") {
        valence
      } else if is_negation(at(3)) {
        valence * N_SCALAR
      } else {
        valence
      }
    }
    _ => valence,
  }
}

/// Sentiment before "but" is halved; sentiment after it is weighted 1.5x.
fn apply_but(lowered: &[String], valences: &mut [f64]) {
  let Some(pivot) = lowered.iter().position(|w| w == "but") else {
    return;
  };
  for (idx, v) in valences.iter_mut().enumerate() {
    if idx < pivot {
      *v *= 0.5;
    } else if idx > pivot {
      *v *= 1.5;
    }
  }
}

fn punctuation_emphasis(text: &str) -> f64 {
  let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
  let questions = text.matches('?').count();

  let question_amp = match questions {
    0 | 1 => 0.0,
    2 | 3 => questions as f64 * QUESTION_INCR,
    _ => QUESTION_MAX,
  };

  exclamations as f64 * EXCLAMATION_INCR + question_amp
}

fn normalize(score: f64) -> f64 {
  (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Positive/negative/neutral shares of the text, rounded to three decimals.
fn proportions(valences: &[f64], emphasis: f64) -> (f64, f64, f64) {
  let mut pos_sum = 0.0;
  let mut neg_sum = 0.0;
  let mut neutral = 0.0;

  for &v in valences {
    if v > 0.0 {
      pos_sum += v + 1.0;
    } else if v < 0.0 {
      neg_sum += v - 1.0;
    } else {
      neutral += 1.0;
    }
  }

  if pos_sum > neg_sum.abs() {
    pos_sum += emphasis;
  } else if pos_sum < neg_sum.abs() {
    neg_sum -= emphasis;
  }

  let total = pos_sum + neg_sum.abs() + neutral;
  if total == 0.0 {
    return (0.0, 0.0, 0.0);
  }

  (
    round_to((pos_sum / total).abs(), 3),
    round_to((neg_sum / total).abs(), 3),
    round_to((neutral / total).abs(), 3),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scorer() -> Scorer { Scorer::new() }

  #[test]
  fn empty_and_blank_text_is_neutral_zero() {
    let s = scorer();
    for text in ["", "   ", "\n\t", "!!!", "a b c"] {
      let score = s.score(text);
      assert_eq!(score.compound, 0.0, "{text:?}");
      assert_eq!(score.label, SentimentLabel::Neutral, "{text:?}");
    }
  }

  #[test]
  fn wonderful_day_is_positive() {
    let score = scorer().score("Wonderful day with family.");
    assert_eq!(score.label, SentimentLabel::Positive);
    assert!(score.compound > 0.05, "compound = {}", score.compound);
  }

  #[test]
  fn plain_negative_text() {
    let score = scorer().score("I feel sad and hopeless today.");
    assert_eq!(score.label, SentimentLabel::Negative);
    assert!(score.negative > score.positive);
  }

  #[test]
  fn neutral_text_without_lexicon_hits() {
    let score = scorer().score("The meeting is at noon on Tuesday.");
    assert_eq!(score.compound, 0.0);
    assert_eq!(score.label, SentimentLabel::Neutral);
    assert_eq!(score.neutral, 1.0);
  }

  #[test]
  fn negation_flips_polarity() {
    let s = scorer();
    assert!(s.score("good").compound > 0.0);
    assert!(s.score("not good").compound < 0.0);
    assert_eq!(s.score("I don't feel happy").label, SentimentLabel::Negative);
  }

  #[test]
  fn never_so_amplifies_instead_of_negating() {
    let s = scorer();
    assert!(s.score("never so happy").compound > s.score("happy").compound);
  }

  #[test]
  fn degree_modifiers_scale_intensity() {
    let s = scorer();
    let plain = s.score("good").compound;
    assert!(s.score("very good").compound > plain);
    assert!(s.score("slightly good").compound < plain);
    assert!(s.score("very bad").compound < s.score("bad").compound);
  }

  #[test]
  fn emphasis_from_caps_and_punctuation() {
    let s = scorer();
    let plain = s.score("good day").compound;
    assert!(s.score("GOOD day").compound > plain);
    assert!(s.score("good day!!!").compound > plain);
    assert!(s.score("bad day!!!").compound < s.score("bad day").compound);
  }

  #[test]
  fn contrastive_but_weights_second_clause() {
    let score = scorer().score("The food was great but the service was terrible");
    assert_eq!(score.label, SentimentLabel::Negative);
  }

  #[test]
  fn kind_of_is_a_hedge() {
    let s = scorer();
    assert_eq!(s.score("kind of").compound, 0.0);
    assert!(s.score("she is kind").compound > 0.0);
  }

  #[test]
  fn emoticons_survive_tokenization() {
    let s = scorer();
    assert_eq!(s.score("see you :)").label, SentimentLabel::Positive);
    assert_eq!(s.score("see you :(").label, SentimentLabel::Negative);
  }

  #[test]
  fn deterministic() {
    let s = scorer();
    let text = "Bit stressed about the upcoming project deadline. Need to manage time better.";
    assert_eq!(s.score(text), s.score(text));
    assert_eq!(Scorer::new().score(text), s.score(text));
  }

  #[test]
  fn label_always_agrees_with_compound() {
    let s = scorer();
    let texts = [
      "Feeling great today! Completed my morning run and feeling energized.",
      "Bit stressed about the upcoming project deadline. Need to manage time better.",
      "Wonderful day with family. We had a picnic in the park.",
      "Not feeling my best today. Woke up with a headache.",
      "Productive work session! Finally solved that tricky coding problem.",
      "meh",
      "not bad",
      "WHY is everything SO hard???",
      "Ok.",
    ];
    for text in texts {
      let score = s.score(text);
      assert_eq!(score.label, SentimentLabel::from_score(score.compound), "{text}");
      assert!((-1.0..=1.0).contains(&score.compound), "{text}");
    }
  }

  #[test]
  fn very_long_text_stays_in_range() {
    let s = scorer();
    let text = "terrible awful horrible day!!! ".repeat(20_000);
    let score = s.score(&text);
    assert!(score.compound >= -1.0 && score.compound < 0.0);
    assert_eq!(score.label, SentimentLabel::Negative);

    let mixed = "happy sad ".repeat(50_000);
    let score = s.score(&mixed);
    assert!((-1.0..=1.0).contains(&score.compound));
  }

  #[test]
  fn proportions_sum_to_roughly_one() {
    let score = scorer().score("Wonderful day with family. We had a picnic in the park.");
    let total = score.positive + score.negative + score.neutral;
    assert!((total - 1.0).abs() < 0.01, "total = {total}");
  }

  #[test]
  fn custom_lexicon_replaces_builtin() {
    let s = Scorer::with_lexicon(Lexicon::parse("rainy\t-2.0\n").unwrap());
    assert_eq!(s.score("rainy afternoon").label, SentimentLabel::Negative);
    assert_eq!(s.score("wonderful afternoon").compound, 0.0);
  }
}
