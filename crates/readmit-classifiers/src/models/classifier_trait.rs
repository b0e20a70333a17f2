use anyhow::Result;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};

/// Contract shared by every classifier taking part in a benchmark.
///
/// Labels are class ids (`usize`). A model is fitted once; calling `fit`
/// again replaces the previous fit.
pub trait ClassifierModel {
    /// Fit the model on rows of `x` labelled by `y`.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()>;

    /// Predict one class id per row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>>;

    /// Human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }

    /// Column names used when the fitted model is exported. Models that
    /// never expose their structure ignore them.
    fn set_feature_names(&mut self, _names: &[String]) {}

    /// The fitted tree, for models whose decision logic is a single tree.
    fn as_decision_tree(&self) -> Option<&DecisionTree<f64, usize>> {
        None
    }
}
