use std::path::Path;

use anyhow::{Context, Result};
use maud::{html, PreEscaped, DOCTYPE};

use crate::benchmark::BenchmarkOutcome;
use crate::report::plots::{plot_fold_accuracies, plot_mean_accuracy};

/// Write a standalone HTML page with the result table and accuracy plots.
pub fn write_html_report<P: AsRef<Path>>(
    path: P,
    outcomes: &[BenchmarkOutcome],
    title: &str,
) -> Result<()> {
    let path = path.as_ref();
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let folds_plot = plot_fold_accuracies(outcomes, "Accuracy per fold").to_inline_html(Some("fold-accuracies"));
    let mean_plot = plot_mean_accuracy(outcomes, "Mean accuracy").to_inline_html(Some("mean-accuracy"));

    let markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
                script src="https://cdn.plot.ly/plotly-2.12.1.min.js" {}
                style { "body { font-family: sans-serif; margin: 2em; } td, th { padding: 0.3em 1em; text-align: left; }" }
            }
            body {
                h1 { (title) }
                p { "Generated " (generated) }
                table {
                    thead {
                        tr { th { "Classifier" } th { "Mean accuracy" } th { "Std" } th { "Folds" } }
                    }
                    tbody {
                        @for outcome in outcomes {
                            tr {
                                td { (outcome.name) }
                                @match &outcome.outcome {
                                    Ok(result) => {
                                        td { (format!("{:.4}", result.mean_accuracy)) }
                                        td { (result.std_accuracy.map(|s| format!("{:.4}", s)).unwrap_or_else(|| "-".to_string())) }
                                        td { (result.fold_accuracies.len()) }
                                    }
                                    Err(e) => {
                                        td colspan="3" { "failed: " (e.to_string()) }
                                    }
                                }
                            }
                        }
                    }
                }
                (PreEscaped(folds_plot))
                (PreEscaped(mean_plot))
            }
        }
    };

    std::fs::write(path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", path.display()))?;
    log::info!("HTML report written to {}", path.display());
    Ok(())
}
