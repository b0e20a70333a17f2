use anyhow::Result;

use readmit_classifiers::benchmark::{run_benchmark, BenchmarkOutcome};
use readmit_classifiers::data_handling::class_counts;
use readmit_classifiers::io::{CsvDatasetLoader, DatasetLoader};
use readmit_classifiers::report::{format_report, write_html_report, write_results_tsv};

use super::input::BenchmarkRunConfig;

/// Load the dataset, cross-validate every configured predictor and write the
/// requested outputs. Fails when the run is misconfigured or when no
/// predictor produced a result.
pub fn run_benchmark_command(config: &BenchmarkRunConfig) -> Result<Vec<BenchmarkOutcome>> {
    let params = &config.benchmark;

    let dataset = CsvDatasetLoader::new(params.dataset.clone()).load()?;
    let y = dataset.target(&params.target)?;
    dataset.log_input_data_summary(&y);
    if class_counts(&y).len() > 2 {
        log::warn!(
            "Target has {} classes; summed readmission labels are multi-class",
            class_counts(&y).len()
        );
    }

    let outcomes = run_benchmark(&dataset.x, &y, params, &params.predictors)?;

    print!("{}", format_report(&outcomes));

    if let Some(output_file) = &config.output_file {
        write_results_tsv(output_file, &outcomes)?;
    }
    if let Some(report_file) = &config.report_file {
        write_html_report(report_file, &outcomes, "Readmission classifier benchmark")?;
    }

    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    if succeeded == 0 {
        anyhow::bail!("All {} predictors failed", outcomes.len());
    }
    log::info!("{}/{} predictors completed", succeeded, outcomes.len());

    Ok(outcomes)
}
