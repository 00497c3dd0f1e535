//! Error types for `healthcue-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Input rejected before any scoring or storage took place.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("lexicon line {line}: {reason}")]
  Lexicon { line: usize, reason: String },

  #[error("unknown sentiment label: {0:?}")]
  UnknownLabel(String),

  #[error("unknown alert type: {0:?}")]
  UnknownAlertType(String),

  #[error("unknown severity: {0:?}")]
  UnknownSeverity(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
