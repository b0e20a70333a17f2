use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::data_handling::LabelCombination;
use crate::io::DatasetConfig;

/// Kernel used by the support-vector classifier.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SvmKernel {
    Linear,
    /// Radial basis function, `exp(-gamma * ||a - b||^2)`.
    Rbf { gamma: f64 },
    Poly { constant: f64, degree: f64 },
}

/// Split quality measure for tree based models.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SplitCriterion {
    #[default]
    Gini,
    Entropy,
}

/// Supported model families and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    Knn {
        k: usize,
    },
    Svm {
        kernel: SvmKernel,
        c: f64,
        eps: f64,
    },
    DecisionTree {
        max_depth: Option<usize>,
        criterion: SplitCriterion,
        min_weight_split: f32,
        min_weight_leaf: f32,
    },
    RandomForest {
        n_estimators: usize,
        max_depth: Option<usize>,
        max_features: usize,
        bootstrap: bool,
        seed: u64,
    },
    Mlp {
        hidden_layer_sizes: Vec<usize>,
        learning_rate: f64,
        alpha: f64,
        max_iter: usize,
        batch_size: usize,
        tol: f64,
        n_iter_no_change: usize,
        seed: u64,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::decision_tree(Some(5))
    }
}

impl ModelType {
    pub fn knn(k: usize) -> Self {
        ModelType::Knn { k }
    }

    pub fn linear_svm(c: f64) -> Self {
        ModelType::Svm {
            kernel: SvmKernel::Linear,
            c,
            eps: 1e-3,
        }
    }

    pub fn rbf_svm(gamma: f64, c: f64) -> Self {
        ModelType::Svm {
            kernel: SvmKernel::Rbf { gamma },
            c,
            eps: 1e-3,
        }
    }

    pub fn decision_tree(max_depth: Option<usize>) -> Self {
        ModelType::DecisionTree {
            max_depth,
            criterion: SplitCriterion::Gini,
            min_weight_split: 2.0,
            min_weight_leaf: 1.0,
        }
    }

    pub fn random_forest(max_depth: Option<usize>, n_estimators: usize, max_features: usize) -> Self {
        ModelType::RandomForest {
            n_estimators,
            max_depth,
            max_features,
            bootstrap: true,
            seed: 42,
        }
    }

    pub fn mlp(max_iter: usize) -> Self {
        ModelType::Mlp {
            hidden_layer_sizes: vec![100],
            learning_rate: 1e-3,
            alpha: 1e-4,
            max_iter,
            batch_size: 200,
            tol: 1e-4,
            n_iter_no_change: 10,
            seed: 42,
        }
    }

    /// Short identifier accepted by `FromStr`.
    pub fn short_name(&self) -> &'static str {
        match self {
            ModelType::Knn { .. } => "knn",
            ModelType::Svm {
                kernel: SvmKernel::Linear,
                ..
            } => "linear-svm",
            ModelType::Svm {
                kernel: SvmKernel::Rbf { .. },
                ..
            } => "rbf-svm",
            ModelType::Svm {
                kernel: SvmKernel::Poly { .. },
                ..
            } => "poly-svm",
            ModelType::DecisionTree { .. } => "decision-tree",
            ModelType::RandomForest { .. } => "random-forest",
            ModelType::Mlp { .. } => "mlp",
        }
    }

    /// Human readable name used in reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelType::Knn { .. } => "Nearest Neighbors",
            ModelType::Svm {
                kernel: SvmKernel::Linear,
                ..
            } => "Linear SVM",
            ModelType::Svm {
                kernel: SvmKernel::Rbf { .. },
                ..
            } => "RBF SVM",
            ModelType::Svm {
                kernel: SvmKernel::Poly { .. },
                ..
            } => "Polynomial SVM",
            ModelType::DecisionTree { .. } => "Decision Tree",
            ModelType::RandomForest { .. } => "Random Forest",
            ModelType::Mlp { .. } => "Neural Net",
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "knn" | "nearest-neighbors" => Ok(ModelType::knn(3)),
            "linear-svm" => Ok(ModelType::linear_svm(0.025)),
            "rbf-svm" => Ok(ModelType::rbf_svm(2.0, 1.0)),
            "poly-svm" => Ok(ModelType::Svm {
                kernel: SvmKernel::Poly {
                    constant: 1.0,
                    degree: 3.0,
                },
                c: 1.0,
                eps: 1e-3,
            }),
            "decision-tree" | "tree" => Ok(ModelType::decision_tree(Some(5))),
            "random-forest" | "forest" => Ok(ModelType::random_forest(Some(5), 10, 1)),
            "mlp" | "neural-net" => Ok(ModelType::mlp(1000)),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: knn, linear-svm, rbf-svm, poly-svm, decision-tree, random-forest, mlp",
                s
            )),
        }
    }
}

/// A named, pre-configured classifier taking part in a run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PredictorSpec {
    pub name: String,
    pub model: ModelType,
}

impl PredictorSpec {
    pub fn new(name: impl Into<String>, model: ModelType) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }

    /// Default comparison suite: k-NN, linear SVM, decision tree, random
    /// forest, RBF SVM and a neural net.
    pub fn default_suite() -> Vec<PredictorSpec> {
        [
            ModelType::knn(3),
            ModelType::linear_svm(0.025),
            ModelType::decision_tree(Some(5)),
            ModelType::random_forest(Some(5), 10, 1),
            ModelType::rbf_svm(2.0, 1.0),
            ModelType::mlp(1000),
        ]
        .into_iter()
        .map(|model| PredictorSpec::new(model.display_name(), model))
        .collect()
    }
}

impl From<ModelType> for PredictorSpec {
    fn from(model: ModelType) -> Self {
        PredictorSpec::new(model.display_name(), model)
    }
}

/// How sample indices are split into cross-validation folds.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FoldStrategy {
    KFold,
    #[default]
    Stratified,
}

/// Which label vector a run is evaluated against.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TargetSelection {
    /// A single named label column.
    Column(String),
    /// Element-wise combination of the listed columns, or of every label
    /// column when `columns` is empty.
    Combined {
        combination: LabelCombination,
        #[serde(default)]
        columns: Vec<String>,
    },
}

impl Default for TargetSelection {
    fn default() -> Self {
        TargetSelection::Combined {
            combination: LabelCombination::Sum,
            columns: Vec::new(),
        }
    }
}

/// Parameters of a cross-validated benchmark run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub dataset: DatasetConfig,
    pub target: TargetSelection,
    pub folds: usize,
    pub fold_strategy: FoldStrategy,
    pub shuffle: bool,
    pub seed: u64,
    pub strict_class_coverage: bool,
    pub scale_features: bool,
    pub predictors: Vec<PredictorSpec>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            target: TargetSelection::default(),
            folds: 5,
            fold_strategy: FoldStrategy::Stratified,
            shuffle: false,
            seed: 42,
            strict_class_coverage: false,
            scale_features: true,
            predictors: PredictorSpec::default_suite(),
        }
    }
}

/// Parameters of a single train/test split run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HoldoutConfig {
    pub dataset: DatasetConfig,
    pub target: TargetSelection,
    pub test_fraction: f64,
    /// `None` draws a fresh split on every run.
    pub seed: Option<u64>,
    pub scale_features: bool,
    pub predictor: PredictorSpec,
}

impl Default for HoldoutConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            target: TargetSelection::Column("y_readmission30d".to_string()),
            test_fraction: 0.3,
            seed: None,
            scale_features: false,
            predictor: PredictorSpec::from(ModelType::decision_tree(Some(5))),
        }
    }
}
