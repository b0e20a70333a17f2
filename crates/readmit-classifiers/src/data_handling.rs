//! In-memory dataset and label derivation.
//!
//! A `Dataset` holds the feature matrix, every named label vector read from
//! the source and the feature names. It is validated once on construction
//! and never mutated afterwards; runs borrow it.
use std::collections::BTreeMap;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::config::TargetSelection;
use crate::error::BenchmarkError;

/// Element-wise rule used to merge several label vectors into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelCombination {
    /// Sum of the values at each index. Several binary indicators summed
    /// this way give a multi-class target (0..=n).
    #[default]
    Sum,
    /// 1 when any source value is non-zero, 0 otherwise.
    Any,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Array2<f64>,
    /// Label vectors in source column order.
    pub labels: Vec<(String, Array1<usize>)>,
    pub feature_names: Vec<String>,
}

impl Dataset {
    pub fn new(
        x: Array2<f64>,
        labels: Vec<(String, Array1<usize>)>,
        feature_names: Vec<String>,
    ) -> Result<Self, BenchmarkError> {
        let n_samples = x.nrows();

        if feature_names.len() != x.ncols() {
            return Err(BenchmarkError::DataLoad(format!(
                "{} feature names for {} feature columns",
                feature_names.len(),
                x.ncols()
            )));
        }

        if labels.is_empty() {
            return Err(BenchmarkError::DataLoad(
                "dataset has no label vectors".to_string(),
            ));
        }

        for (name, y) in &labels {
            if y.len() != n_samples {
                return Err(BenchmarkError::DataLoad(format!(
                    "label '{}' has {} entries but the feature matrix has {} rows",
                    name,
                    y.len(),
                    n_samples
                )));
            }
        }

        Ok(Dataset {
            x,
            labels,
            feature_names,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn label(&self, name: &str) -> Option<&Array1<usize>> {
        self.labels
            .iter()
            .find(|(label_name, _)| label_name == name)
            .map(|(_, y)| y)
    }

    /// Resolve the label vector a run evaluates against.
    pub fn target(&self, selection: &TargetSelection) -> Result<Array1<usize>, BenchmarkError> {
        match selection {
            TargetSelection::Column(name) => self.label(name).cloned().ok_or_else(|| {
                BenchmarkError::Configuration(format!(
                    "unknown target label '{}'; available labels: {}",
                    name,
                    self.label_names().join(", ")
                ))
            }),
            TargetSelection::Combined {
                combination,
                columns,
            } => {
                let sources: Vec<&Array1<usize>> = if columns.is_empty() {
                    self.labels.iter().map(|(_, y)| y).collect()
                } else {
                    columns
                        .iter()
                        .map(|name| {
                            self.label(name).ok_or_else(|| {
                                BenchmarkError::Configuration(format!(
                                    "unknown label '{}' in combined target",
                                    name
                                ))
                            })
                        })
                        .collect::<Result<_, _>>()?
                };
                combine_labels(&sources, *combination)
            }
        }
    }

    pub fn log_input_data_summary(&self, y: &Array1<usize>) {
        log::info!(
            "Dataset: {} samples, {} features, labels [{}]",
            self.n_samples(),
            self.n_features(),
            self.label_names().join(", ")
        );
        for (class, count) in class_counts(y) {
            log::info!("  class {}: {} samples", class, count);
        }
    }
}

/// Combine parallel label vectors index by index.
///
/// Samples are never reordered: output position `i` only depends on the
/// values at position `i` of every source.
pub fn combine_labels(
    sources: &[&Array1<usize>],
    combination: LabelCombination,
) -> Result<Array1<usize>, BenchmarkError> {
    let Some(first) = sources.first() else {
        return Err(BenchmarkError::DataLoad(
            "cannot derive a label from zero label vectors".to_string(),
        ));
    };
    let n = first.len();
    if let Some(bad) = sources.iter().find(|y| y.len() != n) {
        return Err(BenchmarkError::DataLoad(format!(
            "label vectors differ in length ({} vs {})",
            n,
            bad.len()
        )));
    }

    let combined = (0..n)
        .map(|i| {
            let values = sources.iter().map(|y| y[i]);
            match combination {
                LabelCombination::Sum => values.sum::<usize>(),
                LabelCombination::Any => values.into_iter().any(|v| v != 0) as usize,
            }
        })
        .collect::<Array1<usize>>();

    Ok(combined)
}

/// Number of samples per class, ordered by class id.
pub fn class_counts(y: &Array1<usize>) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for &label in y.iter() {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}
