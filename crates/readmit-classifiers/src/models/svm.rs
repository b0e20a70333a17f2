use anyhow::{anyhow, bail, Result};
use linfa::composing::MultiClassModel;
use linfa::dataset::Pr;
use linfa::prelude::*;
use linfa_svm::{Svm, SvmParams};
use ndarray::{Array1, Array2};

use crate::config::{ModelType, SvmKernel};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{check_fit_input, distinct_classes};

enum FittedSvm {
    /// The training set held a single class; every prediction is that class.
    Constant(usize),
    OneVsAll(MultiClassModel<Array2<f64>, usize>),
}

/// Support-vector classifier backed by `linfa-svm`.
///
/// Multi-class targets are handled one-vs-all: one Platt-calibrated binary
/// SVM per class, the most probable class wins.
pub struct SVMClassifier {
    model: Option<FittedSvm>,
    params: ModelType,
}

impl SVMClassifier {
    pub fn new(params: ModelType) -> Self {
        SVMClassifier {
            model: None,
            params,
        }
    }

    fn svm_params(&self) -> Result<SvmParams<f64, Pr>> {
        let ModelType::Svm { kernel, c, eps } = &self.params else {
            bail!("Expected ModelType::Svm params, got {:?}", self.params);
        };
        if *c <= 0.0 {
            bail!("SVM regularisation C must be positive, got {}", c);
        }

        let params = Svm::<f64, Pr>::params().eps(*eps).pos_neg_weights(*c, *c);

        // Chain the kernel configuration based on the kernel type
        let params = match kernel {
            SvmKernel::Linear => params.linear_kernel(),
            SvmKernel::Rbf { gamma } => {
                if *gamma <= 0.0 {
                    bail!("RBF gamma must be positive, got {}", gamma);
                }
                // linfa parameterises the Gaussian kernel as exp(-d^2 / eps)
                params.gaussian_kernel(1.0 / *gamma)
            }
            SvmKernel::Poly { constant, degree } => params.polynomial_kernel(*constant, *degree),
        };
        Ok(params)
    }
}

impl ClassifierModel for SVMClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        check_fit_input(x, y)?;
        let params = self.svm_params()?;

        let classes = distinct_classes(y);
        if let [only] = classes.as_slice() {
            log::debug!("SVM training set holds only class {}", only);
            self.model = Some(FittedSvm::Constant(*only));
            return Ok(());
        }

        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let models = dataset
            .one_vs_all()
            .map_err(|e| anyhow!("failed to split classes: {}", e))?
            .into_iter()
            .map(|(label, binary)| {
                params
                    .fit(&binary)
                    .map(|model| (label, model))
                    .map_err(|e| anyhow!("SVM fit for class {} failed: {}", label, e))
            })
            .collect::<Result<Vec<_>>>()?;

        log::trace!("Fitted {} one-vs-all SVMs", models.len());
        self.model = Some(FittedSvm::OneVsAll(models.into_iter().collect()));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        match self.model.as_ref() {
            Some(FittedSvm::Constant(class)) => Ok(Array1::from_elem(x.nrows(), *class)),
            Some(FittedSvm::OneVsAll(model)) => Ok(model.predict(x)),
            None => Err(anyhow!("SVM must be fitted before predicting")),
        }
    }

    fn name(&self) -> &str {
        "svm"
    }
}
