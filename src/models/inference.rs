//! Price prediction pipeline

use crate::error::{ModelError, Result};
use crate::feature_extractor::FeatureExtractor;
use crate::models::cache::ModelCache;
use crate::models::regressor::Regressor;
use crate::types::property::PropertyInputs;
use crate::types::valuation::PredictionResult;
use std::sync::Arc;
use tracing::debug;

/// Stateless pipeline from property inputs to a tiered estimate.
///
/// Inputs are trusted: callers clamp them into their domains first.
pub struct PricePredictor {
    model: Arc<dyn Regressor>,
    extractor: FeatureExtractor,
}

impl PricePredictor {
    pub fn new(model: Arc<dyn Regressor>) -> Self {
        Self {
            model,
            extractor: FeatureExtractor::new(),
        }
    }

    /// Predictor over the model already held by `cache`.
    ///
    /// Fails with `ModelUnavailable` rather than loading.
    pub fn from_cache(cache: &ModelCache) -> Result<Self> {
        cache.loaded().map(Self::new).ok_or(ModelError::ModelUnavailable)
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Predict the price of a property
    pub fn predict(&self, inputs: &PropertyInputs) -> Result<PredictionResult> {
        let features = self.extractor.extract(inputs);

        let estimate = self
            .model
            .predict(&features)?
            .first()
            .copied()
            .ok_or_else(|| ModelError::Inference("model returned no prediction".to_string()))?;

        if !estimate.is_finite() {
            return Err(ModelError::Inference(format!(
                "model returned non-finite estimate {}",
                estimate
            )));
        }

        // A price cannot be negative; linear models dip below zero at the
        // low corners of the input domain.
        let result = PredictionResult::new(estimate.max(0.0));
        debug!(
            model = %self.model.name(),
            estimate = result.estimate,
            tier = ?result.tier,
            "Price predicted"
        );

        Ok(result)
    }

    /// Predict from the five attributes, in column order
    pub fn predict_price(
        &self,
        income: f64,
        age: f64,
        rooms: f64,
        bedrooms: f64,
        population: f64,
    ) -> Result<PredictionResult> {
        self.predict(&PropertyInputs::new(income, age, rooms, bedrooms, population))
    }
}

/// Predict with the process-wide model.
///
/// The model must already have been loaded through `get_model`; otherwise
/// this fails with `ModelUnavailable`.
pub fn predict_price(
    income: f64,
    age: f64,
    rooms: f64,
    bedrooms: f64,
    population: f64,
) -> Result<PredictionResult> {
    PricePredictor::from_cache(ModelCache::global())?
        .predict_price(income, age, rooms, bedrooms, population)
}
