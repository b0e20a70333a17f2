use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use readmit_classifiers::config::{BenchmarkConfig, ModelType, PredictorSpec};
use readmit_classifiers::error::BenchmarkError;

use crate::util::{apply_data_override, target_override};

/// Cross-validation run settings plus where to write its results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkRunConfig {
    #[serde(flatten)]
    pub benchmark: BenchmarkConfig,
    /// TSV table of per-predictor results.
    pub output_file: Option<PathBuf>,
    /// Standalone HTML report with accuracy plots.
    pub report_file: Option<PathBuf>,
}

impl BenchmarkRunConfig {
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => {
                let config_json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {:?}", path))?;
                serde_json::from_str(&config_json)
                    .with_context(|| format!("Failed to parse config file: {:?}", path))?
            }
            None => BenchmarkRunConfig::default(),
        };

        // Apply CLI overrides
        apply_data_override(&mut config.benchmark.dataset, matches)?;

        if let Some(folds) = matches.get_one::<usize>("folds") {
            config.benchmark.folds = *folds;
        }

        if let Some(target) = target_override(matches) {
            config.benchmark.target = target;
        }

        if let Some(models) = matches.get_many::<ModelType>("model") {
            config.benchmark.predictors = models.cloned().map(PredictorSpec::from).collect();
        }

        if matches.get_flag("shuffle") {
            config.benchmark.shuffle = true;
        }

        if let Some(seed) = matches.get_one::<u64>("seed") {
            config.benchmark.seed = *seed;
        }

        if matches.get_flag("no_scale") {
            config.benchmark.scale_features = false;
        }

        if let Some(output_file) = matches.get_one::<PathBuf>("output_file") {
            config.output_file = Some(output_file.clone());
        }

        if let Some(report_file) = matches.get_one::<PathBuf>("report_file") {
            config.report_file = Some(report_file.clone());
        }

        if config.benchmark.predictors.is_empty() {
            return Err(BenchmarkError::Configuration(
                "no predictors selected".to_string(),
            )
            .into());
        }

        Ok(config)
    }
}
