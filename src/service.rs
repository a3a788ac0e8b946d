//! Request/reply valuation handling, independent of the transport

use crate::metrics::PredictionMetrics;
use crate::models::inference::PricePredictor;
use crate::types::property::PropertyInputs;
use crate::types::valuation::{ValuationFailure, ValuationReply};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

/// Turns request payloads into reply payloads
pub struct ValuationService {
    predictor: PricePredictor,
    metrics: Arc<PredictionMetrics>,
}

impl ValuationService {
    pub fn new(predictor: PricePredictor, metrics: Arc<PredictionMetrics>) -> Self {
        Self { predictor, metrics }
    }

    /// Handle one JSON request and produce the JSON reply.
    ///
    /// Request fields are clamped into their domains before prediction, the
    /// same way the form's bounded fields are.
    pub fn handle(&self, payload: &[u8]) -> Vec<u8> {
        let start_time = Instant::now();

        let requested = match serde_json::from_slice::<PropertyInputs>(payload) {
            Ok(inputs) => inputs,
            Err(e) => {
                warn!(error = %e, "Failed to deserialize valuation request");
                self.metrics.record_failure();
                return encode(&ValuationFailure::bad_request(format!("invalid request: {}", e)));
            }
        };

        let inputs = requested.clamped();
        if !requested.is_within_bounds() {
            debug!(requested = ?requested, clamped = ?inputs, "Request clamped into field bounds");
        }

        match self.predictor.predict(&inputs) {
            Ok(result) => {
                let latency = start_time.elapsed();
                self.metrics.record_prediction(latency, result.tier);

                let reply = ValuationReply::new(&result, inputs);
                debug!(
                    valuation_id = %reply.valuation_id,
                    estimate = result.estimate,
                    tier = ?result.tier,
                    latency_us = latency.as_micros(),
                    "Valuation served"
                );
                encode(&reply)
            }
            Err(e) => {
                error!(error = %e, "Prediction failed");
                self.metrics.record_failure();
                encode(&ValuationFailure::from(&e))
            }
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    // Both reply types are plain structs of strings and numbers
    serde_json::to_vec(value).unwrap_or_else(|e| {
        error!(error = %e, "Failed to encode reply");
        br#"{"error":"failed to encode reply","kind":"internal"}"#.to_vec()
    })
}
