//! HealthCue server: configuration, demo seeding and the outer HTTP layers.
//!
//! The binary in `main.rs` wires these together; they live in the library
//! so they can be tested without binding a socket.

pub mod error;
pub mod seed;

pub use error::{Error, Result};

use std::{
  ops::RangeInclusive,
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use chrono::Duration;
use healthcue_api::{ApiState, AuthConfig, api_router};
use healthcue_core::{
  sentiment::{Scorer, lexicon::Lexicon},
  store::WellnessStore,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `HEALTHCUE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  #[serde(default = "default_store_path")]
  pub store_path:      PathBuf,
  pub jwt_secret:      String,
  #[serde(default = "default_token_ttl_hours")]
  pub token_ttl_hours: i64,
  #[serde(default = "default_seed_demo")]
  pub seed_demo:       bool,
  /// Replaces the built-in sentiment lexicon when set.
  #[serde(default)]
  pub lexicon_path:    Option<PathBuf>,
}

/// Accepted `token_ttl_hours`: one hour to one year.
pub const TOKEN_TTL_HOURS: RangeInclusive<i64> = 1..=8760;

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 5000 }
fn default_store_path() -> PathBuf { PathBuf::from("healthcue.db") }
fn default_token_ttl_hours() -> i64 { 24 }
fn default_seed_demo() -> bool { true }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn auth_config(&self) -> Result<AuthConfig> {
    if !TOKEN_TTL_HOURS.contains(&self.token_ttl_hours) {
      return Err(Error::Config(format!(
        "token_ttl_hours must be within {}..={}, got {}",
        TOKEN_TTL_HOURS.start(),
        TOKEN_TTL_HOURS.end(),
        self.token_ttl_hours
      )));
    }
    Ok(AuthConfig {
      jwt_secret: self.jwt_secret.clone(),
      token_ttl:  Duration::hours(self.token_ttl_hours),
    })
  }

  /// Build the scorer, reading `lexicon_path` if one is configured.
  pub fn load_scorer(&self) -> Result<Scorer> {
    let Some(path) = &self.lexicon_path else {
      return Ok(Scorer::new());
    };
    let path = expand_tilde(path);
    let source = std::fs::read_to_string(&path)
      .map_err(|source| Error::LexiconRead { path: path.clone(), source })?;
    let lexicon = Lexicon::parse(&source)?;
    tracing::info!(path = %path.display(), words = lexicon.len(), "loaded custom lexicon");
    Ok(Scorer::with_lexicon(lexicon))
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Assemble handler state from its parts. Fails on an invalid token lifetime.
pub fn state<S>(store: S, scorer: Scorer, config: &ServerConfig) -> Result<ApiState<S>>
where
  S: WellnessStore,
{
  Ok(ApiState {
    store:  Arc::new(store),
    scorer: Arc::new(scorer),
    engine: Default::default(),
    auth:   Arc::new(config.auth_config()?),
  })
}

/// The API router wrapped in permissive CORS and request tracing.
pub fn app<S>(state: ApiState<S>) -> Router
where
  S: WellnessStore + Clone + 'static,
{
  api_router(state)
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use config::{Config, File, FileFormat};
  use healthcue_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  fn parse(toml: &str) -> std::result::Result<ServerConfig, config::ConfigError> {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()?
      .try_deserialize()
  }

  #[test]
  fn config_defaults() {
    let cfg = parse(r#"jwt_secret = "s3cret""#).unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:5000");
    assert_eq!(cfg.store_path, PathBuf::from("healthcue.db"));
    assert_eq!(cfg.token_ttl_hours, 24);
    assert!(cfg.seed_demo);
    assert!(cfg.lexicon_path.is_none());
    assert_eq!(cfg.auth_config().unwrap().token_ttl, Duration::hours(24));
  }

  #[test]
  fn config_overrides() {
    let cfg = parse(
      r#"
        host = "127.0.0.1"
        port = 8080
        jwt_secret = "s3cret"
        token_ttl_hours = 2
        seed_demo = false
      "#,
    )
    .unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert!(!cfg.seed_demo);
    assert_eq!(cfg.auth_config().unwrap().token_ttl, Duration::hours(2));
  }

  #[test]
  fn token_lifetime_out_of_range_is_rejected() {
    for hours in ["0", "-3", "8761", "9223372036854775807"] {
      let cfg = parse(&format!("jwt_secret = \"s3cret\"\ntoken_ttl_hours = {hours}")).unwrap();
      assert!(matches!(cfg.auth_config(), Err(Error::Config(_))), "{hours}");
    }

    let cfg = parse("jwt_secret = \"s3cret\"\ntoken_ttl_hours = 8760").unwrap();
    assert_eq!(cfg.auth_config().unwrap().token_ttl, Duration::hours(8760));
  }

  #[test]
  fn jwt_secret_is_required() {
    assert!(parse("port = 8080").is_err());
  }

  #[test]
  fn missing_lexicon_file_is_an_error() {
    let mut cfg = parse(r#"jwt_secret = "s3cret""#).unwrap();
    assert!(cfg.load_scorer().is_ok());

    cfg.lexicon_path = Some(PathBuf::from("/nonexistent/healthcue/lexicon.tsv"));
    assert!(matches!(cfg.load_scorer(), Err(Error::LexiconRead { .. })));
  }

  #[test]
  fn tilde_expansion() {
    let plain = Path::new("data/healthcue.db");
    assert_eq!(expand_tilde(plain), plain);
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/healthcue.db")),
        PathBuf::from(home).join("healthcue.db")
      );
    }
  }

  #[tokio::test]
  async fn app_answers_with_cors_headers() {
    let cfg = parse(r#"jwt_secret = "s3cret""#).unwrap();
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = app(state(store, Scorer::new(), &cfg).unwrap());

    let req = Request::builder()
      .uri("/api/health")
      .header(header::ORIGIN, "http://localhost:3000")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
  }
}
