//! Error - Failures at the edges of the game (storage, config, threads)
//!
//! The game itself has no error states; a crash is an ordinary transition.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to start frame loop: {0}")]
    FrameLoop(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
