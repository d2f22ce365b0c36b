pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::JudgeConfig;
pub use error::JudgeError;
pub use pipeline::{run, JudgeOutcome, JudgeRun};
