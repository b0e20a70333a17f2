use anyhow::{anyhow, bail, Result};
use linfa::prelude::*;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2};

use crate::config::{ModelType, SplitCriterion};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::check_fit_input;

/// CART decision tree backed by `linfa-trees`.
pub struct DecisionTreeModel {
    model: Option<DecisionTree<f64, usize>>,
    params: ModelType,
    feature_names: Vec<String>,
}

impl DecisionTreeModel {
    pub fn new(params: ModelType) -> Self {
        DecisionTreeModel {
            model: None,
            params,
            feature_names: Vec::new(),
        }
    }
}

pub(crate) fn split_quality(criterion: SplitCriterion) -> SplitQuality {
    match criterion {
        SplitCriterion::Gini => SplitQuality::Gini,
        SplitCriterion::Entropy => SplitQuality::Entropy,
    }
}

/// Fit a single linfa decision tree; shared with the random forest.
///
/// Non-empty `feature_names` are stored on the split nodes and show up in
/// the TikZ legend.
pub(crate) fn fit_tree(
    x: Array2<f64>,
    y: Array1<usize>,
    feature_names: &[String],
    max_depth: Option<usize>,
    criterion: SplitCriterion,
    min_weight_split: f32,
    min_weight_leaf: f32,
) -> Result<DecisionTree<f64, usize>> {
    if !feature_names.is_empty() && feature_names.len() != x.ncols() {
        bail!(
            "{} feature names given for {} features",
            feature_names.len(),
            x.ncols()
        );
    }
    let dataset = Dataset::new(x, y).with_feature_names(feature_names.to_vec());
    DecisionTree::<f64, usize>::params()
        .split_quality(split_quality(criterion))
        .max_depth(max_depth)
        .min_weight_split(min_weight_split)
        .min_weight_leaf(min_weight_leaf)
        .fit(&dataset)
        .map_err(|e| anyhow!("decision tree fit failed: {}", e))
}

impl ClassifierModel for DecisionTreeModel {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        check_fit_input(x, y)?;

        match &self.params {
            ModelType::DecisionTree {
                max_depth,
                criterion,
                min_weight_split,
                min_weight_leaf,
            } => {
                let tree = fit_tree(
                    x.to_owned(),
                    y.to_owned(),
                    &self.feature_names,
                    *max_depth,
                    *criterion,
                    *min_weight_split,
                    *min_weight_leaf,
                )?;
                log::trace!(
                    "Decision tree fitted: depth {}, {} leaves",
                    tree.max_depth(),
                    tree.num_leaves()
                );
                self.model = Some(tree);
                Ok(())
            }
            other => bail!(
                "Expected ModelType::DecisionTree params, got {:?}",
                other
            ),
        }
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let tree = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow!("decision tree must be fitted before predicting"))?;
        Ok(tree.predict(x))
    }

    fn name(&self) -> &str {
        "decision-tree"
    }

    fn set_feature_names(&mut self, names: &[String]) {
        self.feature_names = names.to_vec();
    }

    fn as_decision_tree(&self) -> Option<&DecisionTree<f64, usize>> {
        self.model.as_ref()
    }
}
