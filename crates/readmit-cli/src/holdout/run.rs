use anyhow::Result;

use readmit_classifiers::benchmark::{run_holdout, BenchmarkOutcome, BenchmarkResult};
use readmit_classifiers::io::{CsvDatasetLoader, DatasetLoader};
use readmit_classifiers::report::{format_report, render_tree};

use super::input::HoldoutRunConfig;

/// Train the configured predictor on one random split and print its
/// accuracy. A requested tree rendering that fails is only logged.
pub fn run_holdout_command(config: &HoldoutRunConfig) -> Result<BenchmarkResult> {
    let params = &config.holdout;

    let dataset = CsvDatasetLoader::new(params.dataset.clone()).load()?;
    let y = dataset.target(&params.target)?;
    dataset.log_input_data_summary(&y);

    let run = run_holdout(&dataset.x, &y, &dataset.feature_names, params)?;

    let outcome = BenchmarkOutcome {
        name: run.result.name.clone(),
        outcome: Ok(run.result.clone()),
    };
    print!("{}", format_report(std::slice::from_ref(&outcome)));

    if let Some(render_file) = &config.render_file {
        if let Err(e) = render_tree(
            run.model.as_ref(),
            &dataset.feature_names,
            render_file,
            config.render_format,
        ) {
            log::warn!("{}", e);
        }
    }

    Ok(run.result)
}
