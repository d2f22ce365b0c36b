//! Response parsing, move judging and metrics for the chess puzzle
//! evaluation harness.

pub mod error;
pub mod fields;
pub mod judge;
pub mod lichess;
pub mod metrics;
pub mod parser;
pub mod store;
pub mod types;

pub use error::{DatasetError, StoreError};
pub use judge::judge_move;
pub use metrics::MetricsReport;
pub use parser::{parse_response, ParsedResponse};
pub use types::{Judgment, Position, Prediction, PredictionSet, Usage};
