//! JSON REST API for HealthCue.
//!
//! Exposes an axum [`Router`] backed by any
//! [`healthcue_core::store::WellnessStore`]. TLS, CORS and request tracing
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = healthcue_api::api_router(state).layer(TraceLayer::new_for_http());
//! ```

pub mod alerts;
pub mod auth;
pub mod dashboard;
pub mod emotions;
pub mod error;
pub mod health;
pub mod journal;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use healthcue_core::{engine::AlertEngine, sentiment::Scorer, store::WellnessStore};

pub use auth::{AuthConfig, CurrentUser};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers. Everything here is built
/// once at startup and injected; handlers hold no globals.
#[derive(Clone)]
pub struct ApiState<S: WellnessStore> {
  pub store:  Arc<S>,
  pub scorer: Arc<Scorer>,
  pub engine: AlertEngine,
  pub auth:   Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: WellnessStore + Clone + 'static,
{
  Router::new()
    .route("/api/health", get(health::handler))
    // Auth
    .route("/api/v1/auth/register", post(auth::register::<S>))
    .route("/api/v1/auth/login", post(auth::login::<S>))
    .route("/api/v1/auth/me", get(auth::me::<S>))
    // Journal
    .route(
      "/api/v1/journal/entries",
      get(journal::list::<S>).post(journal::create::<S>),
    )
    // Alerts
    .route("/api/v1/alerts", get(alerts::list::<S>))
    .route("/api/v1/alerts/{id}/read", post(alerts::mark_read::<S>))
    // Dashboard
    .route("/api/v1/dashboard/stats", get(dashboard::stats::<S>))
    // Emotion captures
    .route("/api/v1/emotion/capture", post(emotions::capture::<S>))
    .route("/api/v1/emotion/history", get(emotions::history::<S>))
    .with_state(state)
}
