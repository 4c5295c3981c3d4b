//! Crate error type

use std::path::PathBuf;

/// Errors raised while loading configuration or addressing levels.
///
/// Per-frame simulation never returns these: a stale handle or a missing
/// overlay element is a silent no-op.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Level index {0} is out of range (0..=6)")]
    UnknownLevel(u8),

    #[error("Invalid tuning value for {field}: {value}")]
    InvalidTuning { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
