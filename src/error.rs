//! Error types for model loading and price prediction

use std::path::PathBuf;
use thiserror::Error;

/// Model errors
///
/// Every variant is terminal for the operation that raised it. A missing or
/// corrupt artifact cannot be fixed by retrying, so nothing here is retried.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No artifact exists at the resolved location
    #[error("model artifact not found at {}", path.display())]
    ArtifactMissing { path: PathBuf },

    /// The artifact exists but could not be turned into a usable model
    #[error("model artifact at {} is corrupt: {reason}", path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// A prediction was attempted before a model was successfully loaded
    #[error("no model is loaded; predictions are unavailable")]
    ModelUnavailable,

    /// The model runtime failed or produced no value
    #[error("inference failed: {0}")]
    Inference(String),
}

impl ModelError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ModelError::ArtifactCorrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            ModelError::ArtifactMissing { .. } => "artifact_missing",
            ModelError::ArtifactCorrupt { .. } => "artifact_corrupt",
            ModelError::ModelUnavailable => "model_unavailable",
            ModelError::Inference(_) => "inference",
        }
    }
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
