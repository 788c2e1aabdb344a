//! Error types for topic-updater.
//!
//! Epistemic taxonomy:
//! - B_i falsified: Expected failures (bad CSV, unknown checkpoint)
//! - I^B materialized: Infrastructure failures (network, timeout, API rejection)
//! - K_i violated: The checkpoint can no longer be written
//!
//! `UpdaterError` is always fatal to a run. Per-row failures are
//! `ListFormatError` and `RemoteError`; the updater logs them and moves on.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::ConfigError;

/// Top-level error type for topic-updater.
#[derive(Debug, Error)]
pub enum UpdaterError {
    // ═══════════════════════════════════════════════════════════════════
    // B_i FALSIFIED — Belief proven wrong (expected failures)
    // ═══════════════════════════════════════════════════════════════════

    #[error("Input error in {path}: {reason}")]
    Input { path: PathBuf, reason: String },

    #[error("Checkpoint id '{id}' not found in input; the CSV may have changed since the last run")]
    Resume { id: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // ═══════════════════════════════════════════════════════════════════
    // K_i VIOLATED — Checkpoint can no longer be trusted
    // ═══════════════════════════════════════════════════════════════════

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors reported by the remote row store for a single row.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl UpdaterError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an input error for a CSV path.
    pub fn input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Input {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for topic-updater.
pub type Result<T> = std::result::Result<T, UpdaterError>;
