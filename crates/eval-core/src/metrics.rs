//! Aggregate statistics over a batch of judgments.

use serde::Serialize;

use crate::types::Judgment;

/// z-score of a two-sided 95% normal-approximation interval.
pub const Z_95: f64 = 1.96;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    /// Fraction correct, in [0, 1]
    pub accuracy: f64,
    /// Half-width of the 95% interval around `accuracy`
    pub confidence_interval: f64,
    /// |mean confidence - accuracy|, absent for an empty batch
    pub calibration_error: Option<f64>,
    pub total_samples: usize,
}

impl MetricsReport {
    pub fn from_judgments(judgments: &[Judgment]) -> Self {
        let total = judgments.len();
        if total == 0 {
            return Self {
                accuracy: 0.0,
                confidence_interval: 0.0,
                calibration_error: None,
                total_samples: 0,
            };
        }

        let n = total as f64;
        let correct = judgments.iter().filter(|j| j.correct).count();
        let accuracy = correct as f64 / n;
        let confidence_interval = Z_95 * (accuracy * (1.0 - accuracy) / n).sqrt();

        let mean_confidence = judgments.iter().map(|j| j.confidence / 100.0).sum::<f64>() / n;
        let calibration_error = Some((mean_confidence - accuracy).abs());

        Self {
            accuracy,
            confidence_interval,
            calibration_error,
            total_samples: total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judgment(correct: bool, confidence: f64) -> Judgment {
        Judgment {
            model_answer: Some("e4".to_string()),
            correct_answer: "e4".to_string(),
            correct,
            confidence,
        }
    }

    #[test]
    fn test_empty_batch() {
        let report = MetricsReport::from_judgments(&[]);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.confidence_interval, 0.0);
        assert!(!report.confidence_interval.is_nan());
        assert_eq!(report.calibration_error, None);
        assert_eq!(report.total_samples, 0);
    }

    #[test]
    fn test_half_correct_calibration() {
        let report = MetricsReport::from_judgments(&[judgment(true, 90.0), judgment(false, 90.0)]);
        assert_eq!(report.accuracy, 0.5);
        assert!((report.calibration_error.unwrap() - 0.4).abs() < 1e-12);
        let expected = 1.96 * (0.25f64 / 2.0).sqrt();
        assert!((report.confidence_interval - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_correct_sample_has_zero_interval() {
        let report = MetricsReport::from_judgments(&[judgment(true, 95.0)]);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.confidence_interval, 0.0);
        assert!((report.calibration_error.unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_all_wrong() {
        let report = MetricsReport::from_judgments(&[judgment(false, 0.0), judgment(false, 0.0)]);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.confidence_interval, 0.0);
        assert_eq!(report.calibration_error, Some(0.0));
        assert_eq!(report.total_samples, 2);
    }
}
