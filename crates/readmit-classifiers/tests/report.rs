//! Integration tests for result tables, HTML reports and tree rendering.

use std::fs;

use ndarray::{array, Array1, Array2};
use readmit_classifiers::benchmark::{BenchmarkOutcome, BenchmarkResult};
use readmit_classifiers::config::ModelType;
use readmit_classifiers::error::BenchmarkError;
use readmit_classifiers::models::classifier_trait::ClassifierModel;
use readmit_classifiers::models::factory::build_model;
use readmit_classifiers::report::{
    format_report, render_tree, write_html_report, write_results_tsv, DotRenderer, RenderFormat,
    TikzRenderer, TreeRenderer,
};
use tempfile::TempDir;

fn outcomes() -> Vec<BenchmarkOutcome> {
    vec![
        BenchmarkOutcome {
            name: "Decision Tree".to_string(),
            outcome: Ok(BenchmarkResult {
                name: "Decision Tree".to_string(),
                mean_accuracy: 0.8125,
                std_accuracy: Some(0.05),
                fold_accuracies: vec![0.75, 0.875],
            }),
        },
        BenchmarkOutcome {
            name: "RBF SVM".to_string(),
            outcome: Err(BenchmarkError::training("RBF SVM", "solver did not converge")),
        },
    ]
}

fn fitted_tree() -> (Box<dyn ClassifierModel>, Vec<String>) {
    let x: Array2<f64> = array![[1.0, 0.0], [2.0, 0.0], [3.0, 1.0], [8.0, 1.0], [9.0, 0.0], [10.0, 1.0]];
    let y: Array1<usize> = array![0, 0, 0, 1, 1, 1];
    let names = vec!["age".to_string(), "\"paced\" flag".to_string()];
    let mut model = build_model(&ModelType::decision_tree(Some(3)));
    model.set_feature_names(&names);
    model.fit(&x, &y).unwrap();
    (model, names)
}

// ---------------------------------------------------------------------------
// Text and TSV
// ---------------------------------------------------------------------------

#[test]
fn format_report_lists_results_in_order() {
    let text = format_report(&outcomes());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Classifier"));
    assert!(lines[1].starts_with("Decision Tree"));
    assert!(lines[1].contains("0.81"));
    assert!(lines[1].contains("0.05"));
    assert!(lines[2].contains("FAILED"));
    assert!(lines[2].contains("solver did not converge"));
}

#[test]
fn tsv_has_one_row_per_outcome() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.tsv");
    write_results_tsv(&path, &outcomes()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let rows: Vec<Vec<&str>> = content.lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], "name");
    assert_eq!(rows[1][1], "0.812500");
    assert_eq!(rows[1][3], "0.750000,0.875000");
    assert_eq!(rows[1][4], "ok");
    assert_eq!(rows[2][4], "failed");
}

#[test]
fn html_report_contains_table_and_plots() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.html");
    write_html_report(&path, &outcomes(), "Readmission benchmark").unwrap();

    let html = fs::read_to_string(&path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Readmission benchmark"));
    assert!(html.contains("Decision Tree"));
    assert!(html.contains("fold-accuracies"));
    assert!(html.contains("failed: "));
}

// ---------------------------------------------------------------------------
// Tree rendering
// ---------------------------------------------------------------------------

#[test]
fn dot_renderer_labels_splits_with_feature_names() {
    let dir = TempDir::new().unwrap();
    let (model, names) = fitted_tree();
    let tree = model.as_decision_tree().unwrap();

    let path = DotRenderer::new(RenderFormat::Dot)
        .render(tree, &names, &dir.path().join("tree"))
        .unwrap();
    assert_eq!(path.extension().unwrap(), "dot");

    let dot = fs::read_to_string(&path).unwrap();
    assert!(dot.starts_with("digraph DecisionTree {"));
    assert!(dot.contains("age < "));
    assert!(dot.contains("class = 0"));
    assert!(dot.contains("class = 1"));
    assert!(dot.contains("n0 -> n1"));
}

#[test]
fn tikz_renderer_writes_tex() {
    let dir = TempDir::new().unwrap();
    let (model, names) = fitted_tree();

    let path = TikzRenderer
        .render(model.as_decision_tree().unwrap(), &names, &dir.path().join("tree"))
        .unwrap();
    assert_eq!(path.extension().unwrap(), "tex");
    let tex = fs::read_to_string(&path).unwrap();
    assert!(tex.contains(r"\begin{forest}"));
    assert!(tex.contains(r"\end{forest}"));
    assert!(tex.contains("Legend:"));
    assert!(tex.contains(r"Var(0)&:&age\\"));
    assert!(!tex.contains("feature-0"));
}

#[test]
fn render_tree_rejects_non_tree_models() {
    let dir = TempDir::new().unwrap();
    let mut knn = build_model(&ModelType::knn(1));
    knn.fit(&array![[0.0], [1.0]], &array![0usize, 1]).unwrap();

    let err = render_tree(knn.as_ref(), &["x".to_string()], &dir.path().join("t"), RenderFormat::Dot)
        .unwrap_err();
    assert!(matches!(err, BenchmarkError::Render(_)));
    assert!(!err.is_fatal());
}

#[test]
fn render_format_parses_names() {
    assert_eq!("PDF".parse::<RenderFormat>().unwrap(), RenderFormat::Pdf);
    assert_eq!("tex".parse::<RenderFormat>().unwrap(), RenderFormat::Tikz);
    assert!("jpeg".parse::<RenderFormat>().is_err());
}
