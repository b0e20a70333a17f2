use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::benchmark::BenchmarkOutcome;

fn format_std(std: Option<f64>) -> String {
    std.map_or_else(|| "-".to_string(), |s| format!("{:.2}", s))
}

/// Human readable accuracy table, one line per predictor in input order.
pub fn format_report(outcomes: &[BenchmarkOutcome]) -> String {
    let width = outcomes
        .iter()
        .map(|o| o.name.len())
        .max()
        .unwrap_or(0)
        .max("Classifier".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {:>8}  {:>8}", "Classifier", "Accuracy", "Std", width = width);
    for outcome in outcomes {
        match &outcome.outcome {
            Ok(result) => {
                let _ = writeln!(
                    out,
                    "{:<width$}  {:>8.2}  {:>8}",
                    outcome.name,
                    result.mean_accuracy,
                    format_std(result.std_accuracy),
                    width = width
                );
            }
            Err(e) => {
                let _ = writeln!(out, "{:<width$}  FAILED: {}", outcome.name, e, width = width);
            }
        }
    }
    out
}

/// Write outcomes as a TSV table.
pub fn write_results_tsv<P: AsRef<Path>>(path: P, outcomes: &[BenchmarkOutcome]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("Failed to create results file: {}", path.display()))?;

    writer.write_record(["name", "mean_accuracy", "std_accuracy", "fold_accuracies", "status", "error"])?;
    for outcome in outcomes {
        let record = match &outcome.outcome {
            Ok(result) => [
                outcome.name.clone(),
                format!("{:.6}", result.mean_accuracy),
                result.std_accuracy.map(|s| format!("{:.6}", s)).unwrap_or_default(),
                result
                    .fold_accuracies
                    .iter()
                    .map(|a| format!("{:.6}", a))
                    .collect::<Vec<_>>()
                    .join(","),
                "ok".to_string(),
                String::new(),
            ],
            Err(e) => [
                outcome.name.clone(),
                String::new(),
                String::new(),
                String::new(),
                "failed".to_string(),
                e.to_string(),
            ],
        };
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write results file: {}", path.display()))?;
    log::info!("Results written to {}", path.display());
    Ok(())
}
