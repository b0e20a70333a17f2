use anyhow::{anyhow, bail, Result};
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use crate::config::{ModelType, SplitCriterion};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::decision_tree::fit_tree;
use crate::models::utils::{check_fit_input, majority_vote};

/// One bagged tree and the feature columns it was trained on.
struct ForestMember {
    features: Vec<usize>,
    tree: DecisionTree<f64, usize>,
}

/// Bagging ensemble of `linfa-trees` decision trees.
///
/// Each tree sees a bootstrap sample of the rows and a random subset of
/// `max_features` columns; predictions are a majority vote.
pub struct RandomForestClassifier {
    members: Vec<ForestMember>,
    params: ModelType,
}

impl RandomForestClassifier {
    pub fn new(params: ModelType) -> Self {
        RandomForestClassifier {
            members: Vec::new(),
            params,
        }
    }
}

impl ClassifierModel for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        check_fit_input(x, y)?;

        let ModelType::RandomForest {
            n_estimators,
            max_depth,
            max_features,
            bootstrap,
            seed,
        } = &self.params
        else {
            bail!("Expected ModelType::RandomForest params, got {:?}", self.params);
        };
        if *n_estimators == 0 {
            bail!("random forest needs at least one estimator");
        }

        let (n_samples, n_features) = x.dim();
        if n_features == 0 {
            bail!("random forest needs at least one feature column");
        }
        let n_selected = (*max_features).clamp(1, n_features);
        let mut rng = StdRng::seed_from_u64(*seed);

        let mut members = Vec::with_capacity(*n_estimators);
        for i in 0..*n_estimators {
            let rows: Vec<usize> = if *bootstrap {
                (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
            } else {
                (0..n_samples).collect()
            };
            let mut features = sample(&mut rng, n_features, n_selected).into_vec();
            features.sort_unstable();

            let x_sub = x.select(Axis(0), &rows).select(Axis(1), &features);
            let y_sub = y.select(Axis(0), &rows);

            let tree = fit_tree(x_sub, y_sub, &[], *max_depth, SplitCriterion::Gini, 2.0, 1.0)
                .map_err(|e| anyhow!("tree {} of the forest: {}", i, e))?;
            members.push(ForestMember { features, tree });
        }

        log::trace!("Random forest fitted with {} trees", members.len());
        self.members = members;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        if self.members.is_empty() {
            bail!("random forest must be fitted before predicting");
        }

        let votes: Vec<Array1<usize>> = self
            .members
            .iter()
            .map(|member| {
                let x_sub = x.select(Axis(1), &member.features);
                member.tree.predict(&x_sub)
            })
            .collect();

        let predictions = (0..x.nrows())
            .map(|row| {
                majority_vote(votes.iter().map(|v| v[row]))
                    .ok_or_else(|| anyhow!("forest produced no votes"))
            })
            .collect::<Result<Vec<usize>>>()?;

        Ok(Array1::from_vec(predictions))
    }

    fn name(&self) -> &str {
        "random-forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_forest_is_reproducible_with_seed() {
        let x = array![
            [0.0, 5.0],
            [0.2, 4.0],
            [0.4, 6.0],
            [0.6, 5.5],
            [3.0, 1.0],
            [3.2, 0.5],
            [3.4, 1.5],
            [3.6, 0.0]
        ];
        let y = array![0usize, 0, 0, 0, 1, 1, 1, 1];

        let run = || {
            let mut clf = RandomForestClassifier::new(ModelType::random_forest(Some(3), 10, 1));
            clf.fit(&x, &y).unwrap();
            clf.predict(&x).unwrap()
        };

        let first = run();
        assert_eq!(first, run());
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn test_forest_rejects_matrix_without_columns() {
        let x = Array2::<f64>::zeros((4, 0));
        let y = array![0usize, 1, 0, 1];

        let mut clf = RandomForestClassifier::new(ModelType::random_forest(None, 5, 3));
        let err = clf.fit(&x, &y).unwrap_err();
        assert!(err.to_string().contains("at least one feature"));
    }
}
