//! Core types, scoring, aggregation and alerting for HealthCue.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend and the API layer both depend on it; the pieces here are
//! constructed explicitly and can be exercised without either of them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod alert;
pub mod emotion;
pub mod engine;
pub mod entry;
pub mod error;
pub mod journal;
pub mod sentiment;
pub mod store;
pub mod user;

pub use error::{Error, Result};
