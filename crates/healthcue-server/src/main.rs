//! healthcue-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `HEALTHCUE_*` environment variables, opens the SQLite store, optionally
//! seeds the demo account, and serves the JSON API over HTTP.
//!
//! The only required setting is `jwt_secret`:
//!
//! ```text
//! HEALTHCUE_JWT_SECRET=change-me cargo run -p healthcue-server
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use healthcue_server::{ServerConfig, app, expand_tilde, seed, state};
use healthcue_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "HealthCue wellness journal API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("HEALTHCUE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let scorer = server_cfg.load_scorer().context("failed to load lexicon")?;

  if server_cfg.seed_demo {
    seed::seed_demo(&store, &scorer, Utc::now())
      .await
      .context("failed to seed demo data")?;
  }

  let state = state(store, scorer, &server_cfg).context("invalid configuration")?;
  let app = app(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
