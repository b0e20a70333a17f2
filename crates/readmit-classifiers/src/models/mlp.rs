use anyhow::{anyhow, bail, Result};
use candle_core::{DType, Device, Tensor, Var, D};
use candle_nn::{AdamW, Linear, Module, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use ndarray::{Array1, Array2};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::ModelType;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{check_fit_input, distinct_classes};

struct Network {
    layers: Vec<Linear>,
    classes: Vec<usize>,
    n_features: usize,
}

impl Network {
    /// Logits for every row of `xs`; ReLU between layers, none on the output.
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let mut h = xs.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            h = layer.forward(&h)?;
            if i + 1 < self.layers.len() {
                h = h.relu()?;
            }
        }
        Ok(h)
    }
}

/// Multilayer perceptron: ReLU hidden layers and a softmax cross-entropy
/// output, trained by mini-batch AdamW on the CPU.
pub struct MlpClassifier {
    network: Option<Network>,
    params: ModelType,
    loss_curve: Vec<f64>,
}

impl MlpClassifier {
    pub fn new(params: ModelType) -> Self {
        MlpClassifier {
            network: None,
            params,
            loss_curve: Vec::new(),
        }
    }

    /// Mean training loss of every completed epoch of the last fit.
    pub fn loss_curve(&self) -> &[f64] {
        &self.loss_curve
    }
}

fn to_tensor(x: &Array2<f64>, device: &Device) -> Result<Tensor> {
    let data: Vec<f64> = x.iter().copied().collect();
    Ok(Tensor::from_vec(data, x.dim(), device)?)
}

/// Seed the variable map with Glorot-uniform weights so that a fit depends
/// only on `rng`. Layer `i` owns `layer{i}.weight` (out x in) and `layer{i}.bias`.
fn init_var_map(var_map: &VarMap, sizes: &[usize], rng: &mut StdRng, device: &Device) -> Result<()> {
    let mut ws = var_map
        .data()
        .lock()
        .map_err(|_| anyhow!("MLP variable map lock poisoned"))?;

    for (i, w) in sizes.windows(2).enumerate() {
        let (fan_in, fan_out) = (w[0], w[1]);
        let bound = (6.0 / (fan_in + fan_out) as f64).sqrt();
        let dist = Uniform::new(-bound, bound);

        let weight: Vec<f64> = (0..fan_in * fan_out).map(|_| rng.sample(&dist)).collect();
        let bias: Vec<f64> = (0..fan_out).map(|_| rng.sample(&dist)).collect();
        ws.insert(
            format!("layer{i}.weight"),
            Var::from_tensor(&Tensor::from_vec(weight, (fan_out, fan_in), device)?)?,
        );
        ws.insert(
            format!("layer{i}.bias"),
            Var::from_tensor(&Tensor::from_vec(bias, fan_out, device)?)?,
        );
    }
    Ok(())
}

impl ClassifierModel for MlpClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        check_fit_input(x, y)?;

        let ModelType::Mlp {
            hidden_layer_sizes,
            learning_rate,
            alpha,
            max_iter,
            batch_size,
            tol,
            n_iter_no_change,
            seed,
        } = &self.params
        else {
            bail!("Expected ModelType::Mlp params, got {:?}", self.params);
        };
        if hidden_layer_sizes.iter().any(|&h| h == 0) {
            bail!("hidden layer sizes must be positive: {:?}", hidden_layer_sizes);
        }
        if *max_iter == 0 || *batch_size == 0 {
            bail!("max_iter and batch_size must be positive");
        }

        let device = Device::Cpu;
        let classes = distinct_classes(y);
        let (n_samples, n_features) = x.dim();

        let targets = y
            .iter()
            .map(|label| {
                classes
                    .binary_search(label)
                    .map(|col| col as u32)
                    .map_err(|_| anyhow!("label {} missing from class list", label))
            })
            .collect::<Result<Vec<u32>>>()?;
        let xs = to_tensor(x, &device)?;
        let ys = Tensor::from_vec(targets, n_samples, &device)?;

        let mut sizes = vec![n_features];
        sizes.extend(hidden_layer_sizes.iter().copied());
        sizes.push(classes.len());

        let mut rng = StdRng::seed_from_u64(*seed);
        let varmap = VarMap::new();
        init_var_map(&varmap, &sizes, &mut rng, &device)?;
        let vb = VarBuilder::from_varmap(&varmap, DType::F64, &device);
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, w)| candle_nn::linear(w[0], w[1], vb.pp(format!("layer{i}"))))
            .collect::<candle_core::Result<Vec<Linear>>>()?;
        let network = Network {
            layers,
            classes,
            n_features,
        };

        let params = ParamsAdamW {
            lr: *learning_rate,
            weight_decay: *alpha,
            ..Default::default()
        };
        let mut opt = AdamW::new(varmap.all_vars(), params)?;

        let batch_size = (*batch_size).min(n_samples);
        let mut indices: Vec<u32> = (0..n_samples as u32).collect();
        let mut best_loss = f64::INFINITY;
        let mut no_improvement = 0usize;
        let mut converged = false;
        self.loss_curve.clear();

        for epoch in 0..*max_iter {
            indices.shuffle(&mut rng);
            let mut epoch_loss = 0.0;

            for batch in indices.chunks(batch_size) {
                let rows = Tensor::new(batch, &device)?;
                let xb = xs.index_select(&rows, 0)?;
                let yb = ys.index_select(&rows, 0)?;

                let logits = network.forward(&xb)?;
                let loss = candle_nn::loss::cross_entropy(&logits, &yb)?;
                opt.backward_step(&loss)?;
                epoch_loss += loss.to_scalar::<f64>()? * batch.len() as f64;
            }

            epoch_loss /= n_samples as f64;
            if !epoch_loss.is_finite() {
                bail!("training diverged at epoch {} (loss {})", epoch + 1, epoch_loss);
            }
            self.loss_curve.push(epoch_loss);

            if epoch_loss > best_loss - tol {
                no_improvement += 1;
            } else {
                no_improvement = 0;
            }
            best_loss = best_loss.min(epoch_loss);

            if no_improvement > *n_iter_no_change {
                log::trace!("MLP stopped after {} epochs, loss {:.5}", epoch + 1, epoch_loss);
                converged = true;
                break;
            }
        }

        if !converged {
            log::warn!(
                "MLP reached max_iter ({}) before the loss converged",
                max_iter
            );
        }

        self.network = Some(network);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let network = self
            .network
            .as_ref()
            .ok_or_else(|| anyhow!("MLP must be fitted before predicting"))?;
        if x.ncols() != network.n_features {
            bail!(
                "MLP fitted on {} features cannot predict {} features",
                network.n_features,
                x.ncols()
            );
        }
        if x.nrows() == 0 {
            return Ok(Array1::zeros(0));
        }

        let logits = network.forward(&to_tensor(x, &Device::Cpu)?)?;
        let best = logits.argmax(D::Minus1)?.to_vec1::<u32>()?;
        best.into_iter()
            .map(|col| {
                network
                    .classes
                    .get(col as usize)
                    .copied()
                    .ok_or_else(|| anyhow!("MLP produced class index {} out of range", col))
            })
            .collect::<Result<Array1<usize>>>()
    }

    fn name(&self) -> &str {
        "mlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small_mlp() -> ModelType {
        ModelType::Mlp {
            hidden_layer_sizes: vec![8],
            learning_rate: 0.05,
            alpha: 1e-4,
            max_iter: 300,
            batch_size: 200,
            tol: 1e-6,
            n_iter_no_change: 10,
            seed: 7,
        }
    }

    fn blobs() -> (Array2<f64>, Array1<usize>) {
        let x = array![
            [-1.0, -1.0],
            [-1.2, -0.8],
            [-0.9, -1.1],
            [1.0, 1.0],
            [1.1, 0.9],
            [0.8, 1.2]
        ];
        (x, array![0usize, 0, 0, 2, 2, 2])
    }

    #[test]
    fn test_mlp_learns_separable_classes() {
        let (x, y) = blobs();

        let mut clf = MlpClassifier::new(small_mlp());
        clf.fit(&x, &y).unwrap();
        let preds = clf.predict(&x).unwrap();
        assert_eq!(preds.to_vec(), y.to_vec());
    }

    #[test]
    fn test_mlp_same_seed_same_training() {
        let (x, y) = blobs();

        let mut first = MlpClassifier::new(small_mlp());
        first.fit(&x, &y).unwrap();
        let mut second = MlpClassifier::new(small_mlp());
        second.fit(&x, &y).unwrap();

        assert_eq!(first.loss_curve().len(), second.loss_curve().len());
        for (a, b) in first.loss_curve().iter().zip(second.loss_curve()) {
            assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
        }
        let curve = first.loss_curve();
        assert!(curve[curve.len() - 1] < curve[0]);
    }

    #[test]
    fn test_mlp_stops_after_patience_without_improvement() {
        let (x, y) = blobs();
        let mut params = small_mlp();
        if let ModelType::Mlp {
            tol,
            n_iter_no_change,
            ..
        } = &mut params
        {
            // no epoch can beat the previous best by this much
            *tol = 1e6;
            *n_iter_no_change = 3;
        }

        let mut clf = MlpClassifier::new(params);
        clf.fit(&x, &y).unwrap();
        // the first epoch improves on infinity, then four epochs without improvement
        assert_eq!(clf.loss_curve().len(), 5);
    }

    #[test]
    fn test_mlp_predict_checks_feature_count() {
        let (x, y) = blobs();
        let mut clf = MlpClassifier::new(small_mlp());
        assert!(clf.predict(&x).is_err());
        clf.fit(&x, &y).unwrap();
        assert!(clf.predict(&array![[1.0, 2.0, 3.0]]).is_err());
    }

    #[test]
    fn test_mlp_rejects_zero_width_layer() {
        let mut params = small_mlp();
        if let ModelType::Mlp {
            hidden_layer_sizes, ..
        } = &mut params
        {
            hidden_layer_sizes[0] = 0;
        }
        let mut clf = MlpClassifier::new(params);
        assert!(clf.fit(&array![[0.0], [1.0]], &array![0usize, 1]).is_err());
    }
}
