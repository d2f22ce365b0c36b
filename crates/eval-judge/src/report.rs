//! Human-readable run summary.

use eval_core::MetricsReport;

pub fn format_summary(model: &str, metrics: &MetricsReport, skipped: usize) -> String {
    let mut out = format!("\nResults for {model}:\n");
    out.push_str(&format!(
        "Accuracy: {:.1}% ± {:.1}%\n",
        metrics.accuracy * 100.0,
        metrics.confidence_interval * 100.0
    ));
    out.push_str(&format!("Total samples: {}\n", metrics.total_samples));
    if let Some(calibration_error) = metrics.calibration_error {
        out.push_str(&format!("Calibration error: {:.1}%\n", calibration_error * 100.0));
    }
    if skipped > 0 {
        out.push_str(&format!("Skipped (no matching position): {skipped}\n"));
    }
    out
}
