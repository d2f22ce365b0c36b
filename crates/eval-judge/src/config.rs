//! Judge configuration from environment variables

use std::env;
use std::path::PathBuf;

pub const DEFAULT_RESULTS_DIR: &str = "outputs/judged_results";

#[derive(Clone, Debug)]
pub struct JudgeConfig {
    /// Directory judged prediction files are written to (created on demand)
    pub results_dir: PathBuf,
}

impl JudgeConfig {
    pub fn from_env() -> Self {
        Self {
            results_dir: env::var("JUDGED_RESULTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_RESULTS_DIR)),
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
        }
    }
}
