//! Resumable prediction run: skip cached positions, query the rest with a
//! bounded worker pool, merge and save.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use eval_core::store::{read_json, write_json_atomic};
use eval_core::{Position, Prediction, PredictionSet, StoreError};

use crate::client::AnthropicClient;
use crate::error::RunnerError;

const PROGRESS_EVERY: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    /// Positions that still needed a prediction at start
    pub requested: usize,
    /// New predictions obtained this run
    pub completed: usize,
    pub total: usize,
}

/// Load cached predictions. A missing file is an empty cache; an
/// undecodable one is discarded with a warning.
pub fn load_existing(path: &Path) -> Result<PredictionSet, RunnerError> {
    if !path.exists() {
        return Ok(PredictionSet::new());
    }
    match read_json::<PredictionSet>(path) {
        Ok(set) => Ok(set),
        Err(StoreError::Decode { source, .. }) => {
            warn!(path = %path.display(), error = %source, "Could not read existing predictions file, starting fresh");
            Ok(PredictionSet::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Positions with no cached prediction, in dataset order.
pub fn pending_positions(positions: &[Position], existing: &PredictionSet) -> Vec<Position> {
    positions
        .iter()
        .filter(|p| !existing.contains(&p.id))
        .cloned()
        .collect()
}

/// Append new predictions after the cached ones.
pub fn merge(mut existing: PredictionSet, new: Vec<(String, Prediction)>) -> PredictionSet {
    for (id, prediction) in new {
        existing.insert(id, prediction);
    }
    existing
}

/// Query every position with at most `num_workers` requests in flight.
/// Results come back in input order; failed positions are logged and left
/// out so the next run retries them.
pub async fn query_all(
    client: Arc<AnthropicClient>,
    positions: Vec<Position>,
    num_workers: usize,
) -> Result<Vec<(String, Prediction)>, RunnerError> {
    let semaphore = Arc::new(Semaphore::new(num_workers.max(1)));
    let total = positions.len();
    let mut handles = Vec::with_capacity(total);

    for position in positions {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| RunnerError::Worker(e.to_string()))?;
        let client = client.clone();

        handles.push(tokio::spawn(async move {
            let _permit = permit; // Hold until done
            let result = client.query(&position).await;
            (position.id, result)
        }));
    }

    let mut results = Vec::with_capacity(total);
    for (done, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok((id, Ok(prediction))) => results.push((id, prediction)),
            Ok((id, Err(e))) => error!(id = %id, error = %e, "Error processing position"),
            Err(e) => error!(error = %e, "Worker task failed"),
        }
        if (done + 1) % PROGRESS_EVERY == 0 || done + 1 == total {
            info!(done = done + 1, total, "Progress");
        }
    }

    Ok(results)
}

pub async fn run(client: Arc<AnthropicClient>, dataset_path: &Path) -> Result<RunSummary, RunnerError> {
    let config = client.config().clone();
    let output_path = config.predictions_path();

    let existing = load_existing(&output_path)?;
    let positions: Vec<Position> = read_json(dataset_path)?;

    let pending = pending_positions(&positions, &existing);
    let requested = pending.len();
    if pending.is_empty() {
        return Ok(RunSummary {
            output_path,
            requested: 0,
            completed: 0,
            total: existing.len(),
        });
    }

    info!(
        pending = requested,
        cached = existing.len(),
        model = %config.model.model,
        "Processing positions"
    );

    let results = query_all(client, pending, config.num_workers).await?;
    let completed = results.len();
    let merged = merge(existing, results);
    write_json_atomic(&output_path, &merged)?;

    Ok(RunSummary {
        output_path,
        requested,
        completed,
        total: merged.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn position(id: &str) -> Position {
        Position {
            id: id.into(),
            question: String::new(),
            answer: "e4".into(),
            ..Default::default()
        }
    }

    fn prediction(response: &str) -> Prediction {
        Prediction::new(response)
    }

    #[test]
    fn test_load_existing_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let set = load_existing(&dir.path().join("predictions_m.json")).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_load_existing_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions_m.json");
        fs::write(&path, "{\"p1\": {\"response\": ").unwrap();
        assert!(load_existing(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_existing_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions_m.json");
        fs::write(&path, r#"{"p2": {"response": "Move: e4"}, "p1": {"response": "x"}}"#).unwrap();
        let set = load_existing(&path).unwrap();
        assert_eq!(set.ids().collect::<Vec<_>>(), vec!["p2", "p1"]);
    }

    #[test]
    fn test_pending_positions() {
        let positions = vec![position("p1"), position("p2"), position("p3")];
        let existing: PredictionSet = vec![("p2".to_string(), prediction("Move: d4"))].into_iter().collect();
        let pending = pending_positions(&positions, &existing);
        let ids: Vec<&str> = pending.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn test_merge_appends_after_existing() {
        let existing: PredictionSet = vec![("p2".to_string(), prediction("old"))].into_iter().collect();
        let merged = merge(
            existing,
            vec![
                ("p1".to_string(), prediction("a")),
                ("p3".to_string(), prediction("b")),
            ],
        );
        assert_eq!(merged.ids().collect::<Vec<_>>(), vec!["p2", "p1", "p3"]);
        assert_eq!(merged.get("p2").unwrap().response_text(), "old");
    }
}
