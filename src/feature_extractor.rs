//! Feature extraction for housing price model inference.
//!
//! The regression model was fitted on five columns in a fixed order. A
//! permuted vector still produces a number, just a wrong one, so the order
//! lives in exactly one place: here.

use crate::types::property::PropertyInputs;

/// Number of model input features
pub const FEATURE_COUNT: usize = 5;

/// Training column names, in model input order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Avg. Area Income",
    "Avg. Area House Age",
    "Avg. Area Number of Rooms",
    "Avg. Area Number of Bedrooms",
    "Area Population",
];

/// Model input row:
/// `[income, house_age, rooms, bedrooms, population]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Single-precision copy for runtimes that take `f32` tensors
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.0.iter().map(|&v| v as f32).collect()
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        FeatureExtractor::new().extract(&PropertyInputs::default())
    }
}

/// Feature extractor that turns form inputs into model input features.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract features from property inputs, in training column order.
    pub fn extract(&self, inputs: &PropertyInputs) -> FeatureVector {
        FeatureVector([
            inputs.average_area_income,
            inputs.average_house_age,
            inputs.number_of_rooms,
            inputs.number_of_bedrooms,
            inputs.area_population,
        ])
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names (matching training order).
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
