//! Integration tests for accuracy statistics and configuration types.

use ndarray::{array, Array1};
use readmit_classifiers::config::{
    BenchmarkConfig, FoldStrategy, HoldoutConfig, ModelType, PredictorSpec, TargetSelection,
};
use readmit_classifiers::data_handling::LabelCombination;
use readmit_classifiers::stats::{accuracy, mean_and_std};

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[test]
fn accuracy_counts_matching_positions() {
    let predicted = array![0usize, 1, 1, 2];
    let truth = array![0usize, 1, 0, 2];
    assert!((accuracy(&predicted, &truth).unwrap() - 0.75).abs() < 1e-12);
}

#[test]
fn accuracy_rejects_length_mismatch() {
    let err = accuracy(&array![0usize, 1], &array![0usize, 1, 1]).unwrap_err();
    assert!(err.to_string().contains("2 predictions for 3 samples"));
    let empty = Array1::<usize>::zeros(0);
    assert_eq!(accuracy(&empty, &empty).unwrap(), 0.0);
}

#[test]
fn mean_and_sample_std() {
    let (mean, std) = mean_and_std(&[0.5, 0.75, 1.0]);
    assert!((mean - 0.75).abs() < 1e-12);
    assert!((std.unwrap() - 0.25).abs() < 1e-12);
}

#[test]
fn single_score_has_no_std() {
    let (mean, std) = mean_and_std(&[0.8]);
    assert!((mean - 0.8).abs() < 1e-12);
    assert!(std.is_none());
}

// ---------------------------------------------------------------------------
// ModelType parsing
// ---------------------------------------------------------------------------

#[test]
fn model_type_parses_short_names() {
    for name in [
        "knn",
        "linear-svm",
        "rbf-svm",
        "poly-svm",
        "decision-tree",
        "random-forest",
        "mlp",
    ] {
        let model: ModelType = name.parse().unwrap();
        assert_eq!(model.short_name(), name);
    }
    assert!("gbdt".parse::<ModelType>().is_err());
}

#[test]
fn default_suite_matches_reference_classifiers() {
    let names: Vec<String> = PredictorSpec::default_suite()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(
        names,
        vec![
            "Nearest Neighbors",
            "Linear SVM",
            "Decision Tree",
            "Random Forest",
            "RBF SVM",
            "Neural Net"
        ]
    );
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

#[test]
fn benchmark_config_round_trips_through_json() {
    let cfg = BenchmarkConfig {
        folds: 3,
        fold_strategy: FoldStrategy::KFold,
        target: TargetSelection::Combined {
            combination: LabelCombination::Any,
            columns: vec!["y_readmission30d".to_string()],
        },
        ..BenchmarkConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    let back: BenchmarkConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg, back);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: BenchmarkConfig = serde_json::from_str(
        r#"{
            "dataset": { "path": "data.csv" },
            "folds": 10,
            "predictors": [ { "name": "k3", "model": { "knn": { "k": 3 } } } ]
        }"#,
    )
    .unwrap();

    assert_eq!(cfg.folds, 10);
    assert_eq!(cfg.fold_strategy, FoldStrategy::Stratified);
    assert!(cfg.scale_features);
    assert_eq!(cfg.dataset.label_columns.len(), 4);
    assert_eq!(cfg.predictors, vec![PredictorSpec::new("k3", ModelType::knn(3))]);
}

#[test]
fn holdout_defaults() {
    let cfg = HoldoutConfig::default();
    assert!((cfg.test_fraction - 0.3).abs() < 1e-12);
    assert!(cfg.seed.is_none());
    assert_eq!(cfg.predictor.model, ModelType::decision_tree(Some(5)));
}
