pub mod classifier_trait;
pub mod decision_tree;
pub mod factory;
pub mod knn;
pub mod mlp;
pub mod random_forest;
pub mod svm;
pub mod utils;
