use anyhow::Result;
use clap::ArgMatches;
use std::path::Path;

use readmit_classifiers::config::TargetSelection;
use readmit_classifiers::data_handling::LabelCombination;
use readmit_classifiers::io::DatasetConfig;

pub fn validate_tsv_or_csv_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("csv") => {}
        _ => anyhow::bail!("File must have a .tsv or .csv extension: {}", path.display()),
    }

    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }

    Ok(())
}

/// Apply `--data` to the dataset section and validate the resulting path.
pub fn apply_data_override(dataset: &mut DatasetConfig, matches: &ArgMatches) -> Result<()> {
    if let Some(data) = matches.get_one::<String>("data") {
        dataset.path = data.into();
    }
    validate_tsv_or_csv_file(&dataset.path)
}

/// Target selection from `--target` / `--combine`, if either was given.
pub fn target_override(matches: &ArgMatches) -> Option<TargetSelection> {
    if let Some(column) = matches.get_one::<String>("target") {
        return Some(TargetSelection::Column(column.clone()));
    }
    let combine = matches
        .try_get_one::<String>("combine")
        .ok()
        .flatten()?;
    let combination = match combine.as_str() {
        "any" => LabelCombination::Any,
        _ => LabelCombination::Sum,
    };
    Some(TargetSelection::Combined {
        combination,
        columns: Vec::new(),
    })
}
