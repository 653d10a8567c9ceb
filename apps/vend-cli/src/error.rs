//! Session-level errors.
//!
//! Mistakes the user makes (bad numbers, out-of-range channels, wrong coins)
//! are reported on the terminal and never surface here. These are the
//! failures that end the session.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
