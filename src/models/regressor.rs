//! Regression model abstraction and the JSON linear model

use crate::error::{ModelError, Result};
use crate::feature_extractor::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A fitted regression function.
///
/// Implementations are immutable once built and shared across threads.
pub trait Regressor: Send + Sync {
    /// Model name, for logging
    fn name(&self) -> &str;

    /// Predict for a single row. Returns one value per model output.
    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>>;
}

/// Linear regression stored as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    /// Model name
    #[serde(default = "default_linear_name")]
    pub model: String,

    /// Training column names, if the exporter recorded them
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,

    /// One coefficient per feature, in column order
    pub coefficients: Vec<f64>,

    pub intercept: f64,
}

fn default_linear_name() -> String {
    "linear_regression".to_string()
}

impl LinearRegressor {
    pub fn new(coefficients: [f64; FEATURE_COUNT], intercept: f64) -> Self {
        Self {
            model: default_linear_name(),
            feature_names: Some(FEATURE_NAMES.iter().map(|n| n.to_string()).collect()),
            coefficients: coefficients.to_vec(),
            intercept,
        }
    }

    /// Parse a JSON artifact and check its shape against the feature layout
    pub fn from_json(path: &Path, bytes: &[u8]) -> Result<Self> {
        let model: LinearRegressor =
            serde_json::from_slice(bytes).map_err(|e| ModelError::corrupt(path, e))?;
        model.validate(path)?;
        Ok(model)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::corrupt(
                path,
                format!(
                    "expected {} coefficients, found {}",
                    FEATURE_COUNT,
                    self.coefficients.len()
                ),
            ));
        }

        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(ModelError::corrupt(
                    path,
                    format!(
                        "feature columns {:?} do not match expected order {:?}",
                        names, FEATURE_NAMES
                    ),
                ));
            }
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::corrupt(path, "non-finite model parameters"));
        }

        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn name(&self) -> &str {
        &self.model
    }

    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let value = self
            .coefficients
            .iter()
            .zip(features.as_slice())
            .fold(self.intercept, |acc, (coef, x)| acc + coef * x);
        Ok(vec![value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_extractor::FeatureExtractor;
    use crate::types::property::PropertyInputs;

    fn artifact(json: &str) -> Result<LinearRegressor> {
        LinearRegressor::from_json(Path::new("model.json"), json.as_bytes())
    }

    #[test]
    fn test_linear_prediction() {
        let model = LinearRegressor::new([1.0, 10.0, 100.0, 1000.0, 0.5], 7.0);
        let features = FeatureExtractor::new().extract(&PropertyInputs::new(2.0, 3.0, 4.0, 5.0, 6.0));

        let output = model.predict(&features).unwrap();

        assert_eq!(output, vec![7.0 + 2.0 + 30.0 + 400.0 + 5000.0 + 3.0]);
    }

    #[test]
    fn test_parse_without_feature_names() {
        let model = artifact(r#"{"coefficients": [1, 2, 3, 4, 5], "intercept": -1.5}"#).unwrap();
        assert_eq!(model.name(), "linear_regression");
        assert_eq!(model.intercept, -1.5);
    }

    #[test]
    fn test_wrong_coefficient_count_is_corrupt() {
        let err = artifact(r#"{"coefficients": [1, 2, 3, 4], "intercept": 0}"#).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactCorrupt { .. }));
        assert!(err.to_string().contains("expected 5 coefficients, found 4"));
    }

    #[test]
    fn test_permuted_feature_names_are_corrupt() {
        let json = r#"{
            "feature_names": ["Avg. Area House Age", "Avg. Area Income",
                              "Avg. Area Number of Rooms", "Avg. Area Number of Bedrooms",
                              "Area Population"],
            "coefficients": [1, 2, 3, 4, 5],
            "intercept": 0
        }"#;
        let err = artifact(json).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactCorrupt { .. }));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let err = artifact("\u{80}PK not json").unwrap_err();
        assert!(matches!(err, ModelError::ArtifactCorrupt { .. }));
    }
}
