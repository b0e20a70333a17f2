//! CSV / TSV dataset reader.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::data_handling::Dataset;
use crate::error::BenchmarkError;

/// Source of a `Dataset`.
pub trait DatasetLoader {
    fn load(&self) -> Result<Dataset, BenchmarkError>;
}

/// Configuration for reading a delimited dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to a `.csv` (comma) or `.tsv` (tab) file with a header row.
    pub path: PathBuf,
    /// Columns holding non-negative integer class labels.
    pub label_columns: Vec<String>,
    /// Optional list of feature columns to load (in order).
    /// When `None`, every non-label, non-ignored column is a feature.
    pub feature_columns: Option<Vec<String>>,
    /// Columns to skip when auto-selecting features.
    pub ignore_columns: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            label_columns: vec![
                "y_readmission30d".to_string(),
                "y_readmission60d".to_string(),
                "y_readmission180d".to_string(),
                "y_readmission1y".to_string(),
            ],
            feature_columns: None,
            ignore_columns: vec!["id".to_string(), "patient_id".to_string()],
        }
    }
}

impl DatasetConfig {
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// Reads the dataset described by a `DatasetConfig`.
#[derive(Debug, Clone)]
pub struct CsvDatasetLoader {
    config: DatasetConfig,
}

impl CsvDatasetLoader {
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }
}

impl DatasetLoader for CsvDatasetLoader {
    fn load(&self) -> Result<Dataset, BenchmarkError> {
        read_dataset(&self.config).map_err(|e| match e.downcast::<BenchmarkError>() {
            Ok(err) => err,
            Err(e) => BenchmarkError::DataLoad(format!("{:#}", e)),
        })
    }
}

fn delimiter_for(path: &Path) -> Result<u8> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("csv") => Ok(b','),
        Some("tsv") => Ok(b'\t'),
        _ => Err(anyhow!(
            "Dataset file must have a .csv or .tsv extension: {}",
            path.display()
        )),
    }
}

/// Read a delimited dataset file into a validated `Dataset`.
pub fn read_dataset(config: &DatasetConfig) -> Result<Dataset> {
    let path = &config.path;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path)?)
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open dataset file: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read dataset header row")?
        .clone();

    if config.label_columns.is_empty() {
        return Err(anyhow!("No label columns configured"));
    }

    let label_indices = config
        .label_columns
        .iter()
        .map(|name| {
            find_column(&headers, name).ok_or_else(|| anyhow!("Missing label column '{}'", name))
        })
        .collect::<Result<Vec<_>>>()?;

    let feature_indices = resolve_feature_indices(&headers, config, &label_indices)?;
    if feature_indices.is_empty() {
        return Err(anyhow!("No feature columns detected in dataset header"));
    }

    let mut features = Vec::new();
    let mut labels: Vec<Vec<usize>> = vec![Vec::new(); label_indices.len()];

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        for (slot, &idx) in label_indices.iter().enumerate() {
            let label = parse_label(&record, idx).with_context(|| {
                format!(
                    "Invalid label '{}' at row {}",
                    headers.get(idx).unwrap_or(""),
                    row_idx + 1
                )
            })?;
            labels[slot].push(label);
        }

        for &idx in &feature_indices {
            let value = record
                .get(idx)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    anyhow!(
                        "Missing value for feature '{}' at row {}",
                        headers.get(idx).unwrap_or(""),
                        row_idx + 1
                    )
                })?;
            let parsed = value.parse::<f64>().with_context(|| {
                format!(
                    "Invalid feature '{}' at row {}",
                    headers.get(idx).unwrap_or(""),
                    row_idx + 1
                )
            })?;
            features.push(parsed);
        }
    }

    let n_samples = labels[0].len();
    if n_samples == 0 {
        return Err(anyhow!("Dataset file has no rows: {}", path.display()));
    }

    let n_features = feature_indices.len();
    let x = Array2::from_shape_vec((n_samples, n_features), features)
        .context("Failed to build feature matrix")?;

    let feature_names = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect();

    let labels = label_indices
        .iter()
        .zip(labels)
        .map(|(&idx, values)| {
            (
                headers.get(idx).unwrap_or("").to_string(),
                Array1::from_vec(values),
            )
        })
        .collect();

    log::debug!(
        "Read {} rows x {} features from {}",
        n_samples,
        n_features,
        path.display()
    );

    Dataset::new(x, labels, feature_names).map_err(anyhow::Error::from)
}

fn parse_label(record: &StringRecord, idx: usize) -> Result<usize> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("missing value"))?;

    if let Ok(v) = raw.parse::<usize>() {
        return Ok(v);
    }

    // Labels exported as floats ("1.0") are accepted when integral.
    let v = raw.parse::<f64>()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
        Ok(v as usize)
    } else {
        Err(anyhow!("'{}' is not a non-negative integer class", raw))
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn resolve_feature_indices(
    headers: &StringRecord,
    config: &DatasetConfig,
    label_indices: &[usize],
) -> Result<Vec<usize>> {
    if let Some(names) = &config.feature_columns {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = find_column(headers, name)
                .ok_or_else(|| anyhow!("Missing feature column '{}'", name))?;
            if label_indices.contains(&idx) {
                return Err(anyhow!("Column '{}' is both a label and a feature", name));
            }
            indices.push(idx);
        }
        return Ok(indices);
    }

    let ignore: HashSet<String> = config
        .ignore_columns
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();

    let indices = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !label_indices.contains(idx))
        .filter(|(_, header)| !ignore.contains(&header.trim().to_ascii_lowercase()))
        .map(|(idx, _)| idx)
        .collect();

    Ok(indices)
}
