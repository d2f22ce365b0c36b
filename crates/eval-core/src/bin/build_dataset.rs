//! Build an evaluation dataset from the Lichess puzzle database.
//!
//! Reads lichess_db_puzzle.csv, keeps puzzles tagged with the requested theme,
//! converts each to a position with a SAN answer, writes a JSON array.
//!
//! Usage:
//!   cargo run --bin build-dataset -- lichess_db_puzzle.csv data/mate_in_1.json --limit 500

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use eval_core::lichess::LichessPuzzle;
use eval_core::store::write_json_atomic;
use eval_core::Position;

#[derive(Parser)]
#[command(name = "build-dataset", about = "Filter Lichess puzzles into an evaluation set")]
struct Args {
    /// Lichess puzzle CSV
    input: PathBuf,

    /// Output dataset JSON
    output: PathBuf,

    /// Theme a puzzle must carry to be kept
    #[arg(long, default_value = "mateIn1")]
    theme: String,

    /// Stop after this many positions
    #[arg(long)]
    limit: Option<usize>,
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

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let reader = BufReader::new(file);

    let mut positions: Vec<Position> = Vec::new();
    let mut scanned = 0usize;
    let mut errors = 0usize;

    for line in reader.lines() {
        let line = line.with_context(|| format!("Failed to read {}", args.input.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        let puzzle = match LichessPuzzle::from_csv_line(&line) {
            Ok(Some(p)) => p,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "Skipping row");
                errors += 1;
                continue;
            }
        };
        scanned += 1;

        if !puzzle.has_theme(&args.theme) {
            continue;
        }

        match puzzle.to_position() {
            Ok(position) => positions.push(position),
            Err(e) => {
                warn!(error = %e, "Skipping puzzle");
                errors += 1;
                continue;
            }
        }

        if args.limit.is_some_and(|limit| positions.len() >= limit) {
            break;
        }
    }

    write_json_atomic(&args.output, &positions)?;

    info!(scanned, kept = positions.len(), errors, theme = %args.theme, "Dataset built");
    println!("Done: {} positions, {} errors", positions.len(), errors);
    println!("Wrote to {}", args.output.display());

    Ok(())
}
