//! Query a model for every position in a dataset.
//!
//! Predictions are cached in MODEL_PREDICTIONS_DIR/predictions_<model>.json;
//! positions already present there are skipped, so an interrupted run can be
//! resumed by running the same command again.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use model_runner::client::AnthropicClient;
use model_runner::config::{ModelConfig, RunnerConfig, DEFAULT_MODEL};
use model_runner::runner;

#[derive(Parser)]
#[command(name = "query-model", about = "Collect model predictions for a puzzle dataset")]
struct Args {
    /// Dataset JSON (array of positions)
    #[arg(long)]
    dataset: PathBuf,

    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, default_value_t = 150)]
    max_completion_tokens: u32,

    #[arg(long, default_value_t = 0.0)]
    temperature: f64,

    /// Concurrent requests
    #[arg(long, default_value_t = 5)]
    num_workers: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for the API key
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let model = ModelConfig {
        model: args.model,
        max_tokens: args.max_completion_tokens,
        temperature: args.temperature,
    };
    let config = RunnerConfig::load(model, args.num_workers)?;
    info!(
        model = %config.model.model,
        num_workers = config.num_workers,
        "Runner config loaded"
    );

    let client = Arc::new(AnthropicClient::new(config)?);
    let summary = runner::run(client, &args.dataset).await?;

    if summary.requested == 0 {
        println!("No new positions to process.");
        return Ok(());
    }

    println!(
        "Completed {}/{} positions ({} total cached)",
        summary.completed, summary.requested, summary.total
    );
    println!("Saved predictions to {}", summary.output_path.display());
    Ok(())
}
