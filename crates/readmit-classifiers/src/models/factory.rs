use crate::config::ModelType;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::decision_tree::DecisionTreeModel;
use crate::models::knn::KnnClassifier;
use crate::models::mlp::MlpClassifier;
use crate::models::random_forest::RandomForestClassifier;
use crate::models::svm::SVMClassifier;

/// Build an unfitted classifier from its configuration.
pub fn build_model(model_type: &ModelType) -> Box<dyn ClassifierModel> {
    match model_type {
        ModelType::Knn { .. } => Box::new(KnnClassifier::new(model_type.clone())),
        ModelType::Svm { .. } => Box::new(SVMClassifier::new(model_type.clone())),
        ModelType::DecisionTree { .. } => Box::new(DecisionTreeModel::new(model_type.clone())),
        ModelType::RandomForest { .. } => {
            Box::new(RandomForestClassifier::new(model_type.clone()))
        }
        ModelType::Mlp { .. } => Box::new(MlpClassifier::new(model_type.clone())),
    }
}
