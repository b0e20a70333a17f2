use anyhow::{anyhow, bail, Result};
use linfa_nn::distance::L2Dist;
use linfa_nn::{CommonNearestNeighbour, NearestNeighbour};
use ndarray::{Array1, Array2};

use crate::config::ModelType;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{check_fit_input, majority_vote};

/// k-nearest-neighbours classifier with uniform weights.
///
/// Fitting stores the training set; neighbours are looked up in a KD-tree
/// from `linfa-nn` built at prediction time.
pub struct KnnClassifier {
    train: Option<(Array2<f64>, Array1<usize>)>,
    params: ModelType,
}

impl KnnClassifier {
    pub fn new(params: ModelType) -> Self {
        KnnClassifier {
            train: None,
            params,
        }
    }

    fn k(&self) -> Result<usize> {
        match &self.params {
            ModelType::Knn { k } => Ok(*k),
            other => bail!("Expected ModelType::Knn params, got {:?}", other),
        }
    }
}

impl ClassifierModel for KnnClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        check_fit_input(x, y)?;
        let k = self.k()?;
        if k == 0 {
            bail!("number of neighbours must be positive");
        }
        if k > x.nrows() {
            bail!(
                "number of neighbours {} exceeds the {} training samples",
                k,
                x.nrows()
            );
        }
        self.train = Some((x.to_owned(), y.to_owned()));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let (train_x, train_y) = self
            .train
            .as_ref()
            .ok_or_else(|| anyhow!("k-NN must be fitted before predicting"))?;
        if x.ncols() != train_x.ncols() {
            bail!(
                "k-NN fitted on {} features cannot predict {} features",
                train_x.ncols(),
                x.ncols()
            );
        }
        let k = self.k()?;

        let index = CommonNearestNeighbour::KdTree
            .from_batch(train_x, L2Dist)
            .map_err(|e| anyhow!("failed to build neighbour index: {}", e))?;

        let mut predictions = Vec::with_capacity(x.nrows());
        for row in x.rows() {
            let neighbours = index
                .k_nearest(row, k)
                .map_err(|e| anyhow!("neighbour query failed: {}", e))?;
            let vote = majority_vote(neighbours.iter().map(|(_, idx)| train_y[*idx]))
                .ok_or_else(|| anyhow!("no neighbours found"))?;
            predictions.push(vote);
        }

        Ok(Array1::from_vec(predictions))
    }

    fn name(&self) -> &str {
        "knn"
    }
}
