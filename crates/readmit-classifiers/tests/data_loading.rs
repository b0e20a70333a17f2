//! Integration tests for dataset reading and label derivation.

use std::fs;
use std::path::PathBuf;

use ndarray::array;
use readmit_classifiers::config::TargetSelection;
use readmit_classifiers::data_handling::{class_counts, combine_labels, LabelCombination};
use readmit_classifiers::error::BenchmarkError;
use readmit_classifiers::io::{CsvDatasetLoader, DatasetConfig, DatasetLoader};
use tempfile::TempDir;

const HEADER: &str = "id,age,bmi,y_readmission30d,y_readmission60d,y_readmission180d,y_readmission1y";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn sample_csv() -> String {
    [
        HEADER,
        "1,70,25.1,0,0,0,0",
        "2,82,30.4,1,1,1,1",
        "3,65,22.0,0,0,1,1",
        "4,77,27.9,0,1,1,1",
    ]
    .join("\n")
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn loads_features_and_every_label_column() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "pacemaker.csv", &sample_csv());

    let ds = CsvDatasetLoader::new(DatasetConfig::with_path(&path))
        .load()
        .unwrap();

    assert_eq!(ds.n_samples(), 4);
    assert_eq!(ds.feature_names, vec!["age", "bmi"]);
    assert_eq!(
        ds.label_names(),
        vec!["y_readmission30d", "y_readmission60d", "y_readmission180d", "y_readmission1y"]
    );
    assert_eq!(ds.x[(1, 1)], 30.4);
    assert_eq!(ds.label("y_readmission180d").unwrap().to_vec(), vec![0, 1, 1, 1]);
}

#[test]
fn loads_tab_separated_files() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "pacemaker.tsv", &sample_csv().replace(',', "\t"));

    let ds = CsvDatasetLoader::new(DatasetConfig::with_path(&path))
        .load()
        .unwrap();
    assert_eq!(ds.n_features(), 2);
}

#[test]
fn missing_file_is_a_data_load_error() {
    let dir = TempDir::new().unwrap();
    let cfg = DatasetConfig::with_path(dir.path().join("absent.csv"));
    let err = CsvDatasetLoader::new(cfg).load().unwrap_err();
    assert!(matches!(err, BenchmarkError::DataLoad(_)));
}

#[test]
fn missing_label_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.csv", "id,age,y_readmission30d\n1,70,0\n");
    let err = CsvDatasetLoader::new(DatasetConfig::with_path(&path))
        .load()
        .unwrap_err();
    match err {
        BenchmarkError::DataLoad(msg) => assert!(msg.contains("y_readmission60d"), "{}", msg),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn non_numeric_or_empty_cells_are_rejected() {
    let dir = TempDir::new().unwrap();
    for row in ["1,old,25.1,0,0,0,0", "1,,25.1,0,0,0,0", "1,70,25.1,yes,0,0,0"] {
        let path = write_file(&dir, "bad.csv", &format!("{}\n{}\n", HEADER, row));
        let err = CsvDatasetLoader::new(DatasetConfig::with_path(&path))
            .load()
            .unwrap_err();
        assert!(matches!(err, BenchmarkError::DataLoad(_)), "{}", row);
    }
}

#[test]
fn header_only_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "empty.csv", &format!("{}\n", HEADER));
    assert!(CsvDatasetLoader::new(DatasetConfig::with_path(&path))
        .load()
        .is_err());
}

#[test]
fn explicit_feature_columns_select_and_order() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "pacemaker.csv", &sample_csv());
    let cfg = DatasetConfig {
        feature_columns: Some(vec!["bmi".to_string()]),
        ..DatasetConfig::with_path(&path)
    };
    let ds = CsvDatasetLoader::new(cfg).load().unwrap();
    assert_eq!(ds.feature_names, vec!["bmi"]);
    assert_eq!(ds.x.column(0).to_vec(), vec![25.1, 30.4, 22.0, 27.9]);
}

// ---------------------------------------------------------------------------
// Label derivation
// ---------------------------------------------------------------------------

#[test]
fn summed_labels_can_be_multi_class() {
    let a = array![0usize, 1, 1, 0];
    let b = array![0usize, 1, 0, 0];
    let c = array![0usize, 1, 1, 1];

    let y = combine_labels(&[&a, &b, &c], LabelCombination::Sum).unwrap();
    assert_eq!(y.to_vec(), vec![0, 3, 2, 1]);
    assert!(class_counts(&y).len() > 2, "summing indicators yields more than two classes");
}

#[test]
fn any_combination_stays_binary() {
    let a = array![0usize, 1, 1, 0];
    let b = array![0usize, 1, 0, 1];
    let y = combine_labels(&[&a, &b], LabelCombination::Any).unwrap();
    assert_eq!(y.to_vec(), vec![0, 1, 1, 1]);
}

#[test]
fn combining_mismatched_lengths_fails() {
    let a = array![0usize, 1];
    let b = array![0usize, 1, 1];
    assert!(combine_labels(&[&a, &b], LabelCombination::Sum).is_err());
    assert!(combine_labels(&[], LabelCombination::Sum).is_err());
}

#[test]
fn target_selection_resolves_against_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "pacemaker.csv", &sample_csv());
    let ds = CsvDatasetLoader::new(DatasetConfig::with_path(&path))
        .load()
        .unwrap();

    let summed = ds.target(&TargetSelection::default()).unwrap();
    assert_eq!(summed.to_vec(), vec![0, 4, 2, 3]);

    let single = ds
        .target(&TargetSelection::Column("y_readmission30d".to_string()))
        .unwrap();
    assert_eq!(single.to_vec(), vec![0, 1, 0, 0]);

    let err = ds
        .target(&TargetSelection::Column("y_unknown".to_string()))
        .unwrap_err();
    assert!(matches!(err, BenchmarkError::Configuration(_)));
}
