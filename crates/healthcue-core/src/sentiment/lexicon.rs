//! Polarity lexicon plus the fixed word lists the scorer consults for degree
//! modifiers and negations.

use std::collections::HashMap;

use crate::{Error, Result};

/// The lexicon compiled into the binary.
const BUILTIN: &str = include_str!("lexicon.tsv");

/// Largest absolute valence a lexicon line may carry.
pub const MAX_VALENCE: f64 = 4.0;

/// Additive boost applied by an intensifier ("very", "extremely").
pub const B_INCR: f64 = 0.293;
/// Additive damping applied by a hedge ("slightly", "barely").
pub const B_DECR: f64 = -0.293;

const BOOSTERS: &[(&str, f64)] = &[
  ("absolutely", B_INCR),
  ("amazingly", B_INCR),
  ("awfully", B_INCR),
  ("completely", B_INCR),
  ("considerably", B_INCR),
  ("decidedly", B_INCR),
  ("deeply", B_INCR),
  ("enormously", B_INCR),
  ("entirely", B_INCR),
  ("especially", B_INCR),
  ("exceptionally", B_INCR),
  ("extremely", B_INCR),
  ("fully", B_INCR),
  ("greatly", B_INCR),
  ("highly", B_INCR),
  ("hugely", B_INCR),
  ("incredibly", B_INCR),
  ("intensely", B_INCR),
  ("majorly", B_INCR),
  ("more", B_INCR),
  ("most", B_INCR),
  ("particularly", B_INCR),
  ("purely", B_INCR),
  ("quite", B_INCR),
  ("really", B_INCR),
  ("remarkably", B_INCR),
  ("so", B_INCR),
  ("substantially", B_INCR),
  ("thoroughly", B_INCR),
  ("totally", B_INCR),
  ("tremendously", B_INCR),
  ("truly", B_INCR),
  ("unbelievably", B_INCR),
  ("utterly", B_INCR),
  ("very", B_INCR),
  ("almost", B_DECR),
  ("barely", B_DECR),
  ("hardly", B_DECR),
  ("kinda", B_DECR),
  ("less", B_DECR),
  ("little", B_DECR),
  ("marginally", B_DECR),
  ("occasionally", B_DECR),
  ("partly", B_DECR),
  ("scarcely", B_DECR),
  ("slightly", B_DECR),
  ("somewhat", B_DECR),
  ("sorta", B_DECR),
];

const NEGATIONS: &[&str] = &[
  "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt",
  "dont", "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither",
  "never", "no", "nobody", "none", "nope", "nor", "not", "nothing",
  "nowhere", "oughtnt", "rarely", "seldom", "shant", "shouldnt", "wasnt",
  "werent", "without", "wont", "wouldnt",
];

/// The degree-modifier scalar for `word` (already lower-cased), if it is one.
pub fn booster(word: &str) -> Option<f64> {
  BOOSTERS
    .iter()
    .find(|(w, _)| *w == word)
    .map(|(_, scalar)| *scalar)
}

/// Whether `word` (already lower-cased) negates what follows it.
pub fn is_negation(word: &str) -> bool {
  NEGATIONS.contains(&word) || word.contains("n't") || word.contains("n\u{2019}t")
}

// ─── Lexicon ─────────────────────────────────────────────────────────────────

/// Token → valence map. Tokens are stored lower-cased.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
  valences: HashMap<String, f64>,
}

impl Lexicon {
  /// The lexicon embedded at compile time.
  pub fn builtin() -> Self {
    match Self::parse(BUILTIN) {
      Ok(lexicon) => lexicon,
      Err(e) => {
        tracing::error!("built-in lexicon is malformed: {e}");
        Self::default()
      }
    }
  }

  /// Parse a tab-separated `token<TAB>valence` lexicon. Blank lines and lines
  /// starting with `#` are skipped; anything else malformed is an error
  /// naming the 1-based line number.
  pub fn parse(source: &str) -> Result<Self> {
    let mut valences = HashMap::new();

    for (idx, line) in source.lines().enumerate() {
      let line_no = idx + 1;
      let trimmed = line.trim_end_matches('\r');
      if trimmed.trim().is_empty() || trimmed.starts_with('#') {
        continue;
      }

      let (token, value) = trimmed.split_once('\t').ok_or_else(|| Error::Lexicon {
        line:   line_no,
        reason: "expected <token>\\t<valence>".into(),
      })?;

      let token = token.trim();
      if token.is_empty() {
        return Err(Error::Lexicon { line: line_no, reason: "empty token".into() });
      }

      let valence: f64 = value.trim().parse().map_err(|_| Error::Lexicon {
        line:   line_no,
        reason: format!("invalid valence {:?}", value.trim()),
      })?;
      if !valence.is_finite() || valence.abs() > MAX_VALENCE {
        return Err(Error::Lexicon {
          line:   line_no,
          reason: format!("valence {valence} outside [-{MAX_VALENCE}, {MAX_VALENCE}]"),
        });
      }

      valences.insert(token.to_lowercase(), valence);
    }

    Ok(Self { valences })
  }

  /// Valence of a lower-cased token.
  pub fn valence(&self, token: &str) -> Option<f64> { self.valences.get(token).copied() }

  pub fn contains(&self, token: &str) -> bool { self.valences.contains_key(token) }

  pub fn len(&self) -> usize { self.valences.len() }

  pub fn is_empty(&self) -> bool { self.valences.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtin_lexicon_parses_strictly() {
    let lexicon = Lexicon::parse(BUILTIN).expect("built-in lexicon");
    assert!(lexicon.len() > 200);
    assert_eq!(lexicon.valence("wonderful"), Some(2.7));
    assert!(lexicon.valence("hopeless").unwrap() < 0.0);
  }

  #[test]
  fn parse_skips_comments_and_lowercases() {
    let lexicon = Lexicon::parse("# header\n\nJoy\t2.8\r\nmeh\t-0.5\n").unwrap();
    assert_eq!(lexicon.len(), 2);
    assert_eq!(lexicon.valence("joy"), Some(2.8));
    assert_eq!(lexicon.valence("meh"), Some(-0.5));
  }

  #[test]
  fn parse_reports_line_numbers() {
    let err = Lexicon::parse("good\t1.9\nbad -2.5\n").unwrap_err();
    assert!(matches!(err, Error::Lexicon { line: 2, .. }), "{err}");

    let err = Lexicon::parse("good\tlots\n").unwrap_err();
    assert!(matches!(err, Error::Lexicon { line: 1, .. }));

    let err = Lexicon::parse("good\t9.5\n").unwrap_err();
    assert!(matches!(err, Error::Lexicon { line: 1, .. }));
  }

  #[test]
  fn negations_and_boosters() {
    assert!(is_negation("not"));
    assert!(is_negation("don't"));
    assert!(is_negation("isn\u{2019}t"));
    assert!(!is_negation("note"));
    assert_eq!(booster("very"), Some(B_INCR));
    assert_eq!(booster("slightly"), Some(B_DECR));
    assert_eq!(booster("day"), None);
  }
}
