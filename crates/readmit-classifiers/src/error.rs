use std::error::Error;
use std::fmt;

/// Errors raised while loading data, validating a run, fitting predictors or
/// rendering artifacts.
///
/// `DataLoad` and `Configuration` are fatal for a run. `Training` is scoped
/// to a single predictor and `Render` never affects numeric results.
#[derive(Debug, Clone, PartialEq)]
pub enum BenchmarkError {
    DataLoad(String),
    Configuration(String),
    Training { model: String, reason: String },
    Render(String),
}

impl BenchmarkError {
    pub fn training(model: impl Into<String>, reason: impl fmt::Display) -> Self {
        BenchmarkError::Training {
            model: model.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BenchmarkError::DataLoad(_) | BenchmarkError::Configuration(_)
        )
    }
}

impl fmt::Display for BenchmarkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BenchmarkError::DataLoad(msg) => write!(f, "Failed to load dataset: {}", msg),
            BenchmarkError::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            BenchmarkError::Training { model, reason } => {
                write!(f, "Predictor '{}' failed: {}", model, reason)
            }
            BenchmarkError::Render(msg) => write!(f, "Failed to render tree: {}", msg),
        }
    }
}

impl Error for BenchmarkError {}
