//! Runner error types

use eval_core::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Empty response for position {0}")]
    EmptyResponse(String),

    #[error("Worker pool error: {0}")]
    Worker(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
