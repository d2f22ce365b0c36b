//! Core error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Malformed CSV row: {0}")]
    MalformedRow(String),

    #[error("Puzzle {id}: invalid FEN: {reason}")]
    InvalidFen { id: String, reason: String },

    #[error("Puzzle {id}: invalid move {uci}: {reason}")]
    InvalidMove {
        id: String,
        uci: String,
        reason: String,
    },

    #[error("Puzzle {0}: no solution move")]
    MissingSolution(String),
}
