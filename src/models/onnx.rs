//! ONNX regression model

use crate::error::{ModelError, Result};
use crate::feature_extractor::{FeatureVector, FEATURE_COUNT};
use crate::models::regressor::Regressor;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Regressor backed by an ONNX Runtime session
pub struct OnnxRegressor {
    /// Model name
    name: String,
    /// ONNX Runtime session; `run` needs exclusive access
    session: Mutex<Session>,
    /// Input name for the model
    input_name: String,
    /// Output name for the prediction
    output_name: String,
}

impl OnnxRegressor {
    /// Load a session from file and resolve its input and output names
    pub fn load(path: &Path, name: &str) -> Result<Self> {
        info!(model = %name, path = %path.display(), "Loading ONNX model");

        let session = Session::builder()
            .map_err(|e| ModelError::corrupt(path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::corrupt(path, e))?
            .with_intra_threads(1)
            .map_err(|e| ModelError::corrupt(path, e))?
            .commit_from_file(path)
            .map_err(|e| ModelError::corrupt(path, e))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| ModelError::corrupt(path, "model declares no inputs"))?;

        // skl2onnx names regressor outputs "variable"; anything else falls back
        // to the first declared output.
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == "variable" || o.name.contains("output"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelError::corrupt(path, "model declares no outputs"))?;

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(Self {
            name: name.to_string(),
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, FEATURE_COUNT as i64];
        let input_tensor = Tensor::from_array((shape, features.to_f32_vec()))
            .map_err(|e| ModelError::Inference(format!("failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ModelError::Inference(format!("Lock error: {}", e)))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            ModelError::Inference(format!("model produced no '{}' output", self.output_name))
        })?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let values: Vec<f64> = data.iter().map(|&v| v as f64).collect();
        debug!(model = %self.name, values = ?values, "ONNX inference complete");

        Ok(values)
    }
}
