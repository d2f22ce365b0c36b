//! Runner configuration from CLI arguments and environment variables

use std::env;
use std::path::PathBuf;

use crate::error::RunnerError;

pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_PREDICTIONS_DIR: &str = "outputs/model_predictions";

/// Generation settings sent with every request.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    /// Model identifier, also used to name the predictions file
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 150,
            temperature: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    pub model: ModelConfig,

    /// Maximum requests in flight
    pub num_workers: usize,

    /// Anthropic API key (ANTHROPIC_API_KEY)
    pub api_key: String,

    /// API base URL, overridable for proxies (ANTHROPIC_API_URL)
    pub api_url: String,

    /// Directory holding predictions_<model>.json (MODEL_PREDICTIONS_DIR)
    pub predictions_dir: PathBuf,
}

impl RunnerConfig {
    /// Combine CLI-provided model settings with the environment.
    pub fn load(model: ModelConfig, num_workers: usize) -> Result<Self, RunnerError> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| RunnerError::Config("ANTHROPIC_API_KEY not set"))?;

        let api_url = env::var("ANTHROPIC_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let predictions_dir = env::var("MODEL_PREDICTIONS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PREDICTIONS_DIR));

        if num_workers == 0 {
            return Err(RunnerError::Config("num_workers must be at least 1"));
        }

        Ok(Self {
            model,
            num_workers,
            api_key,
            api_url,
            predictions_dir,
        })
    }

    pub fn predictions_path(&self) -> PathBuf {
        self.predictions_dir
            .join(format!("predictions_{}.json", self.model.model))
    }
}
