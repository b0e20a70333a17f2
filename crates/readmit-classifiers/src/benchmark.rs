//! Cross-validated benchmarking of several classifiers on one dataset.
//!
//! Predictors are evaluated one after another in input order. Every fold
//! builds a fresh model from the predictor's configuration, so no fitted
//! state is ever shared between folds or predictors. A predictor that fails
//! to fit or predict is reported in place and the batch carries on.
use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

use crate::config::{BenchmarkConfig, HoldoutConfig, PredictorSpec};
use crate::error::BenchmarkError;
use crate::model_selection::{make_folds, train_test_split, Fold, FoldOptions};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::factory::build_model;
use crate::preprocessing::fit_transform;
use crate::stats::{accuracy, mean_and_std};

/// Accuracy summary for one predictor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub mean_accuracy: f64,
    /// Sample standard deviation across folds; `None` for a single split.
    pub std_accuracy: Option<f64>,
    pub fold_accuracies: Vec<f64>,
}

/// Result or failure of one predictor within a run.
#[derive(Debug, Clone)]
pub struct BenchmarkOutcome {
    pub name: String,
    pub outcome: Result<BenchmarkResult, BenchmarkError>,
}

impl BenchmarkOutcome {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Everything a holdout run produces: the score and the fitted model.
pub struct HoldoutRun {
    pub result: BenchmarkResult,
    pub model: Box<dyn ClassifierModel>,
}

fn check_shapes(x: &Array2<f64>, y: &Array1<usize>) -> Result<(), BenchmarkError> {
    if x.nrows() != y.len() {
        return Err(BenchmarkError::Configuration(format!(
            "feature matrix has {} rows but the label vector has {} entries",
            x.nrows(),
            y.len()
        )));
    }
    Ok(())
}

fn fit_and_score(
    spec: &PredictorSpec,
    x: &Array2<f64>,
    y: &Array1<usize>,
    fold: &Fold,
    feature_names: &[String],
) -> anyhow::Result<(f64, Box<dyn ClassifierModel>)> {
    let x_train = x.select(Axis(0), &fold.train);
    let y_train = y.select(Axis(0), &fold.train);
    let x_test = x.select(Axis(0), &fold.test);
    let y_test = y.select(Axis(0), &fold.test);

    let mut model = build_model(&spec.model);
    model.set_feature_names(feature_names);
    model.fit(&x_train, &y_train)?;
    let predictions = model.predict(&x_test)?;
    Ok((accuracy(&predictions, &y_test)?, model))
}

/// Cross-validate one predictor over precomputed folds.
pub fn cross_validate(
    spec: &PredictorSpec,
    x: &Array2<f64>,
    y: &Array1<usize>,
    folds: &[Fold],
) -> Result<BenchmarkResult, BenchmarkError> {
    let mut fold_accuracies = Vec::with_capacity(folds.len());
    for (i, fold) in folds.iter().enumerate() {
        let (score, _) = fit_and_score(spec, x, y, fold, &[]).map_err(|e| {
            BenchmarkError::training(&spec.name, format!("fold {}: {:#}", i + 1, e))
        })?;
        log::debug!("{} fold {}/{}: accuracy {:.4}", spec.name, i + 1, folds.len(), score);
        fold_accuracies.push(score);
    }

    let (mean_accuracy, std_accuracy) = mean_and_std(&fold_accuracies);
    Ok(BenchmarkResult {
        name: spec.name.clone(),
        mean_accuracy,
        std_accuracy,
        fold_accuracies,
    })
}

/// Run the cross-validated benchmark for every predictor, in order.
///
/// Configuration problems (fold count, shapes, sparse classes under strict
/// coverage) are returned as `Err` before any model is trained. An empty
/// predictor list yields an empty outcome list.
pub fn run_benchmark(
    x: &Array2<f64>,
    y: &Array1<usize>,
    config: &BenchmarkConfig,
    predictors: &[PredictorSpec],
) -> Result<Vec<BenchmarkOutcome>, BenchmarkError> {
    check_shapes(x, y)?;

    let options = FoldOptions {
        strategy: config.fold_strategy,
        shuffle: config.shuffle,
        seed: config.seed,
        strict_class_coverage: config.strict_class_coverage,
    };
    let folds = make_folds(y, config.folds, &options)?;

    if predictors.is_empty() {
        log::warn!("No predictors to benchmark");
        return Ok(Vec::new());
    }

    let scaled;
    let x = if config.scale_features {
        scaled = fit_transform(x)?;
        log::info!("Features standardised");
        &scaled
    } else {
        x
    };

    let mut outcomes = Vec::with_capacity(predictors.len());
    for spec in predictors {
        log::info!("Training classifier: {}", spec.name);
        let outcome = cross_validate(spec, x, y, &folds);
        match &outcome {
            Ok(result) => log::info!(
                "{}: accuracy {:.4} (std {:.4})",
                result.name,
                result.mean_accuracy,
                result.std_accuracy.unwrap_or(0.0)
            ),
            Err(e) => log::error!("{}", e),
        }
        outcomes.push(BenchmarkOutcome {
            name: spec.name.clone(),
            outcome,
        });
    }

    Ok(outcomes)
}

/// Train one predictor on a random split and score it on the held-out part.
///
/// `feature_names` label the columns of `x` in the returned model; pass an
/// empty slice when they are unknown.
pub fn run_holdout(
    x: &Array2<f64>,
    y: &Array1<usize>,
    feature_names: &[String],
    config: &HoldoutConfig,
) -> Result<HoldoutRun, BenchmarkError> {
    check_shapes(x, y)?;
    let split = train_test_split(y.len(), config.test_fraction, config.seed)?;
    log::info!(
        "Split {} samples into {} train / {} test",
        y.len(),
        split.train.len(),
        split.test.len()
    );

    let scaled;
    let x = if config.scale_features {
        scaled = fit_transform(x)?;
        &scaled
    } else {
        x
    };

    let spec = &config.predictor;
    log::info!("Training classifier: {}", spec.name);
    let (score, model) = fit_and_score(spec, x, y, &split, feature_names)
        .map_err(|e| BenchmarkError::training(&spec.name, format!("{:#}", e)))?;

    Ok(HoldoutRun {
        result: BenchmarkResult {
            name: spec.name.clone(),
            mean_accuracy: score,
            std_accuracy: None,
            fold_accuracies: vec![score],
        },
        model,
    })
}
