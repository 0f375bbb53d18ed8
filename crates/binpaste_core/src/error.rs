//! Application error types for the client core.
use thiserror::Error;

/// Top-level application error type.
///
/// Wrong passphrases and empty relays are not errors; they surface as `None`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}
