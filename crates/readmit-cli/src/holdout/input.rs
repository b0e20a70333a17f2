use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use readmit_classifiers::config::{HoldoutConfig, ModelType, PredictorSpec};
use readmit_classifiers::report::RenderFormat;

use crate::util::{apply_data_override, target_override};

/// Holdout run settings plus the optional tree rendering target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldoutRunConfig {
    #[serde(flatten)]
    pub holdout: HoldoutConfig,
    /// Output path (without extension) for the fitted tree.
    pub render_file: Option<PathBuf>,
    pub render_format: RenderFormat,
}

impl HoldoutRunConfig {
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => {
                let config_json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {:?}", path))?;
                serde_json::from_str(&config_json)
                    .with_context(|| format!("Failed to parse config file: {:?}", path))?
            }
            None => HoldoutRunConfig::default(),
        };

        // Apply CLI overrides
        apply_data_override(&mut config.holdout.dataset, matches)?;

        if let Some(fraction) = matches.get_one::<f64>("test_fraction") {
            config.holdout.test_fraction = *fraction;
        }

        if let Some(target) = target_override(matches) {
            config.holdout.target = target;
        }

        if let Some(model) = matches.get_one::<ModelType>("model") {
            config.holdout.predictor = PredictorSpec::from(model.clone());
        }

        if let Some(seed) = matches.get_one::<u64>("seed") {
            config.holdout.seed = Some(*seed);
        }

        if matches.get_flag("scale") {
            config.holdout.scale_features = true;
        }

        if let Some(render_file) = matches.get_one::<PathBuf>("render") {
            config.render_file = Some(render_file.clone());
        }

        if let Some(format) = matches.get_one::<RenderFormat>("render_format") {
            config.render_format = *format;
        }

        Ok(config)
    }
}
