//! Integration tests for feature standardisation.

use ndarray::{array, Array2, Axis};
use readmit_classifiers::preprocessing::{fit_scaler, fit_transform};

// ---------------------------------------------------------------------------
// Scaler fit / transform
// ---------------------------------------------------------------------------

#[test]
fn fit_scaler_computes_mean_and_population_std() {
    let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];

    let sc = fit_scaler(&x).unwrap();
    assert!((sc.mean[0] - 2.5).abs() < 1e-12, "mean[0] = {}", sc.mean[0]);
    assert!((sc.mean[1] - 25.0).abs() < 1e-12, "mean[1] = {}", sc.mean[1]);
    // population std of 1..4 is sqrt(1.25)
    assert!((sc.std[0] - 1.25f64.sqrt()).abs() < 1e-12);
}

#[test]
fn fit_transform_gives_zero_mean_unit_variance() {
    let x = array![[1.0, 100.0], [2.0, 200.0], [3.0, 300.0], [4.0, 400.0], [10.0, -5.0]];

    let t = fit_transform(&x).unwrap();
    assert_eq!(t.dim(), (5, 2));

    let mean = t.mean_axis(Axis(0)).unwrap();
    let std = t.std_axis(Axis(0), 0.0);
    for c in 0..2 {
        assert!(mean[c].abs() < 1e-9, "col {} mean = {}", c, mean[c]);
        assert!((std[c] - 1.0).abs() < 1e-9, "col {} std = {}", c, std[c]);
    }
}

#[test]
fn fit_transform_is_idempotent() {
    let x = array![[3.0, -1.0, 7.0], [5.0, 0.0, 7.5], [1.0, 4.0, 6.0], [9.0, 2.0, 8.0]];

    let once = fit_transform(&x).unwrap();
    let twice = fit_transform(&once).unwrap();
    for (a, b) in once.iter().zip(twice.iter()) {
        assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
    }
}

#[test]
fn fit_transform_leaves_input_untouched() {
    let x = array![[1.0, 2.0], [3.0, 4.0]];
    let before = x.clone();
    let _ = fit_transform(&x).unwrap();
    assert_eq!(x, before);
}

#[test]
fn constant_column_maps_to_zero() {
    let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
    let t = fit_transform(&x).unwrap();
    assert!(t.column(1).iter().all(|&v| v == 0.0));
    assert!(t.iter().all(|v| v.is_finite()));
}

#[test]
fn empty_matrix_is_rejected() {
    let x = Array2::<f64>::zeros((0, 3));
    assert!(fit_scaler(&x).is_err());
}
