use anyhow::{bail, Result};
use ndarray::Array1;
use statrs::statistics::Statistics;

/// Fraction of positions where `predicted` equals `truth`.
///
/// Arrays of different lengths are an error; an empty pair scores 0.
pub fn accuracy(predicted: &Array1<usize>, truth: &Array1<usize>) -> Result<f64> {
    if predicted.len() != truth.len() {
        bail!(
            "model returned {} predictions for {} samples",
            predicted.len(),
            truth.len()
        );
    }
    if truth.is_empty() {
        return Ok(0.0);
    }
    let hits = predicted
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    Ok(hits as f64 / truth.len() as f64)
}

/// Mean and sample standard deviation (n - 1 denominator) of fold scores.
///
/// The deviation is `None` for fewer than two scores.
pub fn mean_and_std(scores: &[f64]) -> (f64, Option<f64>) {
    let mean = scores.iter().mean();
    let std = if scores.len() >= 2 {
        Some(scores.iter().std_dev())
    } else {
        None
    };
    (mean, std)
}
