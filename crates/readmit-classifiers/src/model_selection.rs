//! Fold partitioning and train/test splitting.
//!
//! Every strategy returns index sets over `0..n_samples`; held-out sets are
//! pairwise disjoint and their union is the full index range.
use std::collections::HashMap;

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::FoldStrategy;
use crate::error::BenchmarkError;

/// One cross-validation round: fit on `train`, evaluate on `test`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Options controlling how folds are drawn.
#[derive(Debug, Clone, Copy)]
pub struct FoldOptions {
    pub strategy: FoldStrategy,
    pub shuffle: bool,
    pub seed: u64,
    /// Reject (rather than warn about) classes with fewer than `k` members.
    pub strict_class_coverage: bool,
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self {
            strategy: FoldStrategy::Stratified,
            shuffle: false,
            seed: 42,
            strict_class_coverage: false,
        }
    }
}

fn validate_fold_count(n_samples: usize, k: usize) -> Result<(), BenchmarkError> {
    if k < 2 {
        return Err(BenchmarkError::Configuration(format!(
            "fold count must be at least 2, got {}",
            k
        )));
    }
    if k > n_samples {
        return Err(BenchmarkError::Configuration(format!(
            "fold count {} exceeds the number of samples {}",
            k, n_samples
        )));
    }
    Ok(())
}

/// Turn a per-sample fold assignment into `k` train/test index sets.
fn folds_from_assignment(assignment: &[usize], k: usize) -> Vec<Fold> {
    (0..k)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..assignment.len()).partition(|&i| assignment[i] == fold);
            Fold { train, test }
        })
        .collect()
}

/// Plain k-fold: contiguous blocks over the (optionally shuffled) index
/// range; the first `n % k` folds hold one extra sample.
pub fn k_fold(
    n_samples: usize,
    k: usize,
    shuffle: bool,
    seed: u64,
) -> Result<Vec<Fold>, BenchmarkError> {
    validate_fold_count(n_samples, k)?;

    let mut indices: Vec<usize> = (0..n_samples).collect();
    if shuffle {
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    }

    let mut assignment = vec![0usize; n_samples];
    let base = n_samples / k;
    let extra = n_samples % k;
    let mut start = 0;
    for fold in 0..k {
        let size = base + usize::from(fold < extra);
        for &idx in &indices[start..start + size] {
            assignment[idx] = fold;
        }
        start += size;
    }

    Ok(folds_from_assignment(&assignment, k))
}

/// Stratified k-fold: every fold receives (as nearly as possible) the same
/// share of each class.
///
/// Classes are ranked by first appearance. The sorted label sequence is
/// dealt round-robin into `k` piles to decide how many members of each
/// class land in each fold; within a class, members keep their index order
/// (or a seeded shuffle of it).
pub fn stratified_k_fold(
    y: &Array1<usize>,
    k: usize,
    options: &FoldOptions,
) -> Result<Vec<Fold>, BenchmarkError> {
    let n_samples = y.len();
    validate_fold_count(n_samples, k)?;

    let mut class_rank: HashMap<usize, usize> = HashMap::new();
    for &label in y.iter() {
        let next = class_rank.len();
        class_rank.entry(label).or_insert(next);
    }
    let n_classes = class_rank.len();
    let encoded: Vec<usize> = y.iter().map(|label| class_rank[label]).collect();

    let mut class_sizes = vec![0usize; n_classes];
    for &c in &encoded {
        class_sizes[c] += 1;
    }

    if class_sizes.iter().all(|&size| size < k) {
        return Err(BenchmarkError::Configuration(format!(
            "fold count {} is greater than the number of members in every class",
            k
        )));
    }
    let smallest = class_sizes.iter().copied().min().unwrap_or(0);
    if smallest < k {
        let msg = format!(
            "the least populated class has only {} members, which is less than the fold count {}",
            smallest, k
        );
        if options.strict_class_coverage {
            return Err(BenchmarkError::Configuration(msg));
        }
        log::warn!("{}", msg);
    }

    let mut sorted = encoded.clone();
    sorted.sort_unstable();
    let mut allocation = vec![vec![0usize; n_classes]; k];
    for (pos, &c) in sorted.iter().enumerate() {
        allocation[pos % k][c] += 1;
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut assignment = vec![0usize; n_samples];
    for class in 0..n_classes {
        let mut class_folds: Vec<usize> = (0..k)
            .flat_map(|fold| std::iter::repeat(fold).take(allocation[fold][class]))
            .collect();
        if options.shuffle {
            class_folds.shuffle(&mut rng);
        }
        let members = (0..n_samples).filter(|&i| encoded[i] == class);
        for (idx, fold) in members.zip(class_folds) {
            assignment[idx] = fold;
        }
    }

    Ok(folds_from_assignment(&assignment, k))
}

/// Build `k` folds for `y` according to `options`.
pub fn make_folds(
    y: &Array1<usize>,
    k: usize,
    options: &FoldOptions,
) -> Result<Vec<Fold>, BenchmarkError> {
    let folds = match options.strategy {
        FoldStrategy::KFold => k_fold(y.len(), k, options.shuffle, options.seed)?,
        FoldStrategy::Stratified => stratified_k_fold(y, k, options)?,
    };
    log::trace!(
        "Fold sizes: {:?}",
        folds.iter().map(|f| f.test.len()).collect::<Vec<_>>()
    );
    Ok(folds)
}

/// Single random split: `ceil(test_fraction * n)` samples are held out.
///
/// `seed = None` draws from the thread RNG.
pub fn train_test_split(
    n_samples: usize,
    test_fraction: f64,
    seed: Option<u64>,
) -> Result<Fold, BenchmarkError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(BenchmarkError::Configuration(format!(
            "test fraction must lie in (0, 1), got {}",
            test_fraction
        )));
    }

    let n_test = (test_fraction * n_samples as f64).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(BenchmarkError::Configuration(format!(
            "test fraction {} leaves an empty split for {} samples",
            test_fraction, n_samples
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    match seed {
        Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => indices.shuffle(&mut rand::thread_rng()),
    }

    let train = indices.split_off(n_test);
    Ok(Fold {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_k_fold_sizes() {
        let folds = k_fold(11, 3, false, 0).unwrap();
        let sizes: Vec<usize> = folds.iter().map(|f| f.test.len()).collect();
        assert_eq!(sizes, vec![4, 4, 3]);
        assert_eq!(folds[0].test, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_stratified_allocation_matches_proportions() {
        // 6 of class 0, 3 of class 1
        let y = Array1::from_vec(vec![0, 0, 0, 0, 0, 0, 1, 1, 1]);
        let folds = stratified_k_fold(&y, 3, &FoldOptions::default()).unwrap();
        for fold in &folds {
            let ones = fold.test.iter().filter(|&&i| y[i] == 1).count();
            assert_eq!(fold.test.len(), 3);
            assert_eq!(ones, 1);
        }
    }

    #[test]
    fn test_stratified_rejects_when_every_class_is_sparse() {
        let y = Array1::from_vec(vec![0, 0, 1, 1, 2, 2]);
        let err = stratified_k_fold(&y, 3, &FoldOptions::default()).unwrap_err();
        assert!(matches!(err, BenchmarkError::Configuration(_)));
    }

    #[test]
    fn test_strict_class_coverage() {
        let y = Array1::from_vec(vec![0, 0, 0, 0, 0, 1]);
        let lenient = FoldOptions::default();
        assert!(stratified_k_fold(&y, 3, &lenient).is_ok());

        let strict = FoldOptions {
            strict_class_coverage: true,
            ..FoldOptions::default()
        };
        assert!(stratified_k_fold(&y, 3, &strict).is_err());
    }

    #[test]
    fn test_train_test_split_sizes() {
        let split = train_test_split(10, 0.3, Some(7)).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 7);
    }
}
