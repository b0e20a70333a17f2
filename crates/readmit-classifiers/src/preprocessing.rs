//! Feature standardisation.
//!
//! Provides a per-column mean/std `Scaler` fitted on a full feature matrix.
//! Transforming always returns a new matrix; inputs are left untouched.

use ndarray::{Array1, Array2, Axis};

use crate::error::BenchmarkError;

/// Standard scaler (per-column mean and population standard deviation).
#[derive(Clone, Debug, PartialEq)]
pub struct Scaler {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

/// Fit a `Scaler` from a matrix where rows are samples and columns are
/// features. Zero-variance columns get a scale of 1 so they map to 0.
pub fn fit_scaler(x: &Array2<f64>) -> Result<Scaler, BenchmarkError> {
    let (nrows, ncols) = x.dim();
    if nrows == 0 || ncols == 0 {
        return Err(BenchmarkError::Configuration(format!(
            "cannot standardise an empty ({}, {}) matrix",
            nrows, ncols
        )));
    }

    let mean = x
        .mean_axis(Axis(0))
        .ok_or_else(|| BenchmarkError::Configuration("empty feature matrix".to_string()))?;
    let std = x
        .std_axis(Axis(0), 0.0)
        .mapv(|s| if s > 0.0 && s.is_finite() { s } else { 1.0 });

    Ok(Scaler { mean, std })
}

impl Scaler {
    /// Apply the fitted transform to every row of `x`.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, BenchmarkError> {
        if x.ncols() != self.mean.len() {
            return Err(BenchmarkError::Configuration(format!(
                "scaler fitted on {} features applied to {} features",
                self.mean.len(),
                x.ncols()
            )));
        }
        Ok((x - &self.mean) / &self.std)
    }
}

/// Fit a scaler on `x` and return the standardised copy.
pub fn fit_transform(x: &Array2<f64>) -> Result<Array2<f64>, BenchmarkError> {
    let scaler = fit_scaler(x)?;
    log::trace!("Fitted scaler on {} features", scaler.mean.len());
    scaler.transform(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_constant_column_maps_to_zero() {
        let x = array![[1.0, 7.0], [2.0, 7.0], [3.0, 7.0]];
        let t = fit_transform(&x).unwrap();
        for r in 0..3 {
            assert_eq!(t[(r, 1)], 0.0);
        }
    }

    #[test]
    fn test_transform_rejects_wrong_width() {
        let sc = fit_scaler(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert!(sc.transform(&array![[1.0], [2.0]]).is_err());
    }
}
