//! IO utilities for loading delimited dataset files.

pub mod csv_dataset;

pub use csv_dataset::{read_dataset, CsvDatasetLoader, DatasetConfig, DatasetLoader};
