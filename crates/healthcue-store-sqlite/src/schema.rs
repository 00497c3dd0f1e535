//! SQL schema for the HealthCue SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

-- Entries are append-only; score and label never change after insert.
CREATE TABLE IF NOT EXISTS journal_entries (
    entry_id        TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL REFERENCES users(user_id),
    content         TEXT NOT NULL,
    sentiment_label TEXT NOT NULL
        CHECK (sentiment_label IN ('Positive', 'Negative', 'Neutral')),
    sentiment_score REAL NOT NULL,
    created_at      TEXT NOT NULL    -- fixed-width RFC 3339 UTC
);

-- Alerts are never deleted. An alert is open while resolved_at IS NULL.
CREATE TABLE IF NOT EXISTS health_alerts (
    alert_id    TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    alert_type  TEXT NOT NULL,     -- 'welcome' | 'negative_pattern'
    message     TEXT NOT NULL,
    severity    TEXT NOT NULL,     -- 'info' | 'medium' | 'high'
    is_read     INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    resolved_at TEXT
);

-- At most one open negative-pattern episode per user.
CREATE UNIQUE INDEX IF NOT EXISTS health_alerts_open_episode_idx
    ON health_alerts(user_id, alert_type)
    WHERE resolved_at IS NULL AND alert_type = 'negative_pattern';

CREATE TABLE IF NOT EXISTS emotion_captures (
    capture_id TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    emotion    TEXT NOT NULL,
    confidence REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS entries_user_created_idx  ON journal_entries(user_id, created_at);
CREATE INDEX IF NOT EXISTS alerts_user_created_idx   ON health_alerts(user_id, created_at);
CREATE INDEX IF NOT EXISTS emotions_user_created_idx ON emotion_captures(user_id, created_at);

PRAGMA user_version = 1;
";
