//! Judging pipeline error types

use std::path::PathBuf;

use eval_core::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("Input unavailable: {path}: {source}")]
    InputUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Input malformed: {path}: {source}")]
    InputMalformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write judged predictions: {0}")]
    Output(StoreError),
}

impl JudgeError {
    /// Classify a failed input read.
    pub(crate) fn input(err: StoreError) -> Self {
        match err {
            StoreError::Read { path, source } => JudgeError::InputUnavailable { path, source },
            StoreError::Decode { path, source } => JudgeError::InputMalformed { path, source },
            other => JudgeError::Output(other),
        }
    }
}
