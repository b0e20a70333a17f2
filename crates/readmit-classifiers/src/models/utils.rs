use std::collections::BTreeMap;

use anyhow::{bail, Result};
use ndarray::{Array1, Array2};

/// Reject inputs no model can be fitted on.
pub fn check_fit_input(x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
    if x.nrows() != y.len() {
        bail!(
            "feature matrix has {} rows but {} labels were given",
            x.nrows(),
            y.len()
        );
    }
    if x.nrows() == 0 {
        bail!("cannot fit on an empty training set");
    }
    if x.iter().any(|v| !v.is_finite()) {
        bail!("training features contain NaN or infinite values");
    }
    Ok(())
}

/// Sorted distinct class ids in `y`.
pub fn distinct_classes(y: &Array1<usize>) -> Vec<usize> {
    let mut classes: Vec<usize> = y.to_vec();
    classes.sort_unstable();
    classes.dedup();
    classes
}

/// Most frequent value; ties go to the smallest class id.
pub fn majority_vote<I: IntoIterator<Item = usize>>(votes: I) -> Option<usize> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for v in votes {
        *counts.entry(v).or_insert(0) += 1;
    }
    // BTreeMap iterates in ascending key order, so keeping only strictly
    // greater counts favours the smallest class on ties.
    let mut best: Option<(usize, usize)> = None;
    for (class, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((class, count));
        }
    }
    best.map(|(class, _)| class)
}
