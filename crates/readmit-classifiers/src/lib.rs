//! readmit-classifiers: benchmarking classifiers on hospital readmission data.
//!
//! The crate loads a tabular dataset of pacemaker patients, derives a binary
//! (or combined) readmission target, and evaluates a configurable suite of
//! classifiers (k-NN, SVM, decision tree, random forest, MLP) with k-fold or
//! stratified cross-validation. Results can be printed, written as TSV, or
//! rendered into an HTML report; a fitted decision tree can be exported as
//! Graphviz or TikZ.
pub mod benchmark;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod model_selection;
pub mod models;
pub mod preprocessing;
pub mod report;
pub mod stats;
