//! Judge model predictions against a puzzle dataset.
//!
//! Parses each response, grades the move, writes the judged predictions
//! under JUDGED_RESULTS_DIR and prints accuracy and calibration.
//!
//! Usage:
//!   cargo run --bin judge-results -- --dataset data/mate_in_1.json \
//!       --predictions outputs/model_predictions/predictions_claude-3-opus-20240229.json

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use eval_judge::report::format_summary;
use eval_judge::JudgeConfig;

#[derive(Parser)]
#[command(name = "judge-results", about = "Judge model predictions and report accuracy")]
struct Args {
    /// Dataset JSON (array of positions)
    #[arg(long)]
    dataset: PathBuf,

    /// Predictions JSON (id -> prediction)
    #[arg(long)]
    predictions: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = JudgeConfig::from_env();
    info!(results_dir = %config.results_dir.display(), "Judge config loaded");

    let outcome = eval_judge::run(&config, &args.dataset, &args.predictions)?;

    print!(
        "{}",
        format_summary(
            &outcome.model,
            &outcome.run.metrics,
            outcome.run.skipped.len()
        )
    );
    Ok(())
}
