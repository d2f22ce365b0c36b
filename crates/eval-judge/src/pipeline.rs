//! Judging pipeline: load, judge-and-merge, report-and-persist.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eval_core::store::{read_json, write_json_atomic};
use eval_core::{judge_move, parse_response, Judgment, MetricsReport, Position, Prediction, PredictionSet};
use tracing::{info, warn};

use crate::config::JudgeConfig;
use crate::error::JudgeError;

const PREDICTIONS_TAG: &str = "predictions_";
const JUDGED_TAG: &str = "judged_predictions_";

/// Result of judging one predictions file.
#[derive(Debug, Clone)]
pub struct JudgeRun {
    /// Input predictions with `judge_response` attached where a position matched
    pub judged: PredictionSet,
    /// One per matched prediction, in stored order
    pub judgments: Vec<Judgment>,
    /// Prediction ids with no matching position
    pub skipped: Vec<String>,
    pub metrics: MetricsReport,
}

#[derive(Debug, Clone)]
pub struct JudgeOutcome {
    pub model: String,
    pub output_path: PathBuf,
    pub run: JudgeRun,
}

pub fn load_dataset(path: &Path) -> Result<HashMap<String, Position>, JudgeError> {
    let positions: Vec<Position> = read_json(path).map_err(JudgeError::input)?;

    let mut by_id = HashMap::with_capacity(positions.len());
    for position in positions {
        let id = position.id.clone();
        if by_id.insert(id, position).is_some() {
            warn!(path = %path.display(), "Duplicate position id in dataset, keeping the last one");
        }
    }
    Ok(by_id)
}

pub fn load_predictions(path: &Path) -> Result<PredictionSet, JudgeError> {
    read_json(path).map_err(JudgeError::input)
}

/// Parse the response and grade it against the position's answer.
pub fn judge_prediction(prediction: &Prediction, position: &Position) -> Judgment {
    let parsed = parse_response(prediction.response_text());
    let correct = judge_move(parsed.model_move.as_deref(), &position.answer);
    Judgment {
        model_answer: parsed.model_move,
        correct_answer: position.answer.clone(),
        correct,
        confidence: parsed.confidence,
    }
}

/// Judge every prediction that has a position. Unmatched predictions are
/// carried into the output untouched and left out of the metrics.
pub fn judge_predictions(positions: &HashMap<String, Position>, predictions: &PredictionSet) -> JudgeRun {
    let mut judged = PredictionSet::new();
    let mut judgments = Vec::with_capacity(predictions.len());
    let mut skipped = Vec::new();

    for (id, prediction) in predictions.iter() {
        let Some(position) = positions.get(id) else {
            warn!(id = %id, "Position not found in dataset, skipping");
            skipped.push(id.to_string());
            judged.insert(id.to_string(), prediction.clone());
            continue;
        };

        let judgment = judge_prediction(prediction, position);
        judged.insert(id.to_string(), prediction.with_judgment(judgment.clone()));
        judgments.push(judgment);
    }

    let metrics = MetricsReport::from_judgments(&judgments);
    JudgeRun {
        judged,
        judgments,
        skipped,
        metrics,
    }
}

fn file_name(predictions_path: &Path) -> String {
    predictions_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `predictions_<model>.json` becomes `<results_dir>/judged_predictions_<model>.json`.
/// A name without the `predictions_` tag gets a `judged_` prefix instead.
pub fn output_path(results_dir: &Path, predictions_path: &Path) -> PathBuf {
    let name = file_name(predictions_path);
    let judged_name = if name.contains(PREDICTIONS_TAG) {
        name.replace(PREDICTIONS_TAG, JUDGED_TAG)
    } else {
        format!("judged_{name}")
    };
    results_dir.join(judged_name)
}

/// Model label shown in the summary: the file stem without `predictions_`.
pub fn model_name(predictions_path: &Path) -> String {
    predictions_path
        .file_stem()
        .map(|s| s.to_string_lossy().replace(PREDICTIONS_TAG, ""))
        .unwrap_or_default()
}

/// Run the whole pipeline. Both inputs are loaded before anything is
/// written; the output is written once, after all judging.
pub fn run(config: &JudgeConfig, dataset_path: &Path, predictions_path: &Path) -> Result<JudgeOutcome, JudgeError> {
    let positions = load_dataset(dataset_path)?;
    let predictions = load_predictions(predictions_path)?;
    info!(
        positions = positions.len(),
        predictions = predictions.len(),
        "Inputs loaded"
    );

    let run = judge_predictions(&positions, &predictions);

    let out_path = output_path(&config.results_dir, predictions_path);
    write_json_atomic(&out_path, &run.judged).map_err(JudgeError::Output)?;
    info!(
        path = %out_path.display(),
        judged = run.judgments.len(),
        skipped = run.skipped.len(),
        "Judged predictions saved"
    );

    Ok(JudgeOutcome {
        model: model_name(predictions_path),
        output_path: out_path,
        run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(id: &str, answer: &str) -> Position {
        Position {
            id: id.to_string(),
            question: String::new(),
            answer: answer.to_string(),
            ..Default::default()
        }
    }

    fn prediction(response: &str) -> Prediction {
        Prediction::new(response)
    }

    fn positions(items: &[(&str, &str)]) -> HashMap<String, Position> {
        items
            .iter()
            .map(|(id, answer)| (id.to_string(), position(id, answer)))
            .collect()
    }

    #[test]
    fn test_judge_prediction() {
        let j = judge_prediction(&prediction("Move: Qh5+\nConfidence: 80"), &position("p1", "Qh5"));
        assert_eq!(j.model_answer.as_deref(), Some("Qh5+"));
        assert_eq!(j.correct_answer, "Qh5");
        assert!(j.correct);
        assert_eq!(j.confidence, 80.0);
    }

    #[test]
    fn test_unparseable_response_is_incorrect() {
        let j = judge_prediction(&prediction("I resign."), &position("p1", "Qh5"));
        assert_eq!(j.model_answer, None);
        assert!(!j.correct);
        assert_eq!(j.confidence, 100.0);
    }

    #[test]
    fn test_judge_predictions_skips_unmatched() {
        let positions = positions(&[("p1", "e4"), ("p3", "Nf3")]);
        let predictions: PredictionSet = vec![
            ("p1".to_string(), prediction("Move: e4\nConfidence: 90")),
            ("p2".to_string(), prediction("Move: d4")),
            ("p3".to_string(), prediction("Move: Nc3\nConfidence: 50")),
        ]
        .into_iter()
        .collect();

        let run = judge_predictions(&positions, &predictions);
        assert_eq!(run.skipped, vec!["p2".to_string()]);
        assert_eq!(run.judgments.len(), 2);
        assert_eq!(run.metrics.total_samples, 2);
        assert_eq!(run.metrics.accuracy, 0.5);

        assert_eq!(run.judged.ids().collect::<Vec<_>>(), vec!["p1", "p2", "p3"]);
        assert!(run.judged.get("p1").unwrap().judge_response.is_some());
        assert!(run.judged.get("p2").unwrap().judge_response.is_none());
        assert!(!run.judged.get("p3").unwrap().judge_response.as_ref().unwrap().correct);

        // Input is left untouched
        assert!(predictions.get("p1").unwrap().judge_response.is_none());
    }

    #[test]
    fn test_judge_predictions_empty() {
        let run = judge_predictions(&HashMap::new(), &PredictionSet::new());
        assert!(run.judged.is_empty());
        assert_eq!(run.metrics.total_samples, 0);
        assert_eq!(run.metrics.calibration_error, None);
    }

    #[test]
    fn test_output_path() {
        let dir = Path::new("outputs/judged_results");
        assert_eq!(
            output_path(dir, Path::new("outputs/model_predictions/predictions_claude-3-opus-20240229.json")),
            dir.join("judged_predictions_claude-3-opus-20240229.json")
        );
        assert_eq!(output_path(dir, Path::new("run1.json")), dir.join("judged_run1.json"));
    }

    #[test]
    fn test_model_name() {
        assert_eq!(model_name(Path::new("x/predictions_gpt-4o.json")), "gpt-4o");
        assert_eq!(model_name(Path::new("run1.json")), "run1");
    }
}
