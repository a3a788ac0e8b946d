//! Model artifact loader

use crate::error::{ModelError, Result};
use crate::feature_extractor::FeatureVector;
use crate::models::onnx::OnnxRegressor;
use crate::models::regressor::{LinearRegressor, Regressor};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Fixed artifact location, without extension
pub const ARTIFACT_STEM: &str = "models/best_housing_model";

/// Extensions probed at the artifact location, in preference order
pub const ARTIFACT_EXTENSIONS: [&str; 2] = ["onnx", "json"];

/// Resolve the artifact file at `stem`, probing each supported extension.
///
/// Fails with `ArtifactMissing` naming the first candidate when none exists.
pub fn resolve_artifact<P: AsRef<Path>>(stem: P) -> Result<PathBuf> {
    let stem = stem.as_ref();
    let candidates: Vec<PathBuf> = ARTIFACT_EXTENSIONS
        .iter()
        .map(|ext| stem.with_extension(ext))
        .collect();

    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| {
            warn!(stem = %stem.display(), "No model artifact found");
            ModelError::ArtifactMissing {
                path: candidates[0].clone(),
            }
        })
}

/// Something that can turn an artifact path into a model
pub trait ArtifactLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Arc<dyn Regressor>>;
}

/// Loader for ONNX and JSON model artifacts
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelLoader;

impl ModelLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a single artifact, choosing the format by file extension
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<Arc<dyn Regressor>> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(ModelError::ArtifactMissing {
                path: path.to_path_buf(),
            });
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        let model: Arc<dyn Regressor> = match path.extension().and_then(|e| e.to_str()) {
            Some("onnx") => Arc::new(OnnxRegressor::load(path, &name)?),
            Some("json") => {
                info!(model = %name, path = %path.display(), "Loading linear model");
                let bytes = std::fs::read(path).map_err(|e| ModelError::corrupt(path, e))?;
                Arc::new(LinearRegressor::from_json(path, &bytes)?)
            }
            other => {
                return Err(ModelError::corrupt(
                    path,
                    format!("unsupported artifact format {:?}", other.unwrap_or("")),
                ))
            }
        };

        probe(path, model.as_ref())?;

        info!(model = %model.name(), path = %path.display(), "Model ready");
        Ok(model)
    }
}

impl ArtifactLoader for ModelLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn Regressor>> {
        self.load_model(path)
    }
}

/// Run one prediction on the default row to confirm the model accepts a
/// five-feature input and returns a number.
fn probe(path: &Path, model: &dyn Regressor) -> Result<()> {
    let output = model
        .predict(&FeatureVector::default())
        .map_err(|e| ModelError::corrupt(path, format!("probe prediction failed: {}", e)))?;

    match output.first() {
        Some(value) if value.is_finite() => Ok(()),
        Some(value) => Err(ModelError::corrupt(
            path,
            format!("probe prediction returned {}", value),
        )),
        None => Err(ModelError::corrupt(path, "probe prediction returned no value")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LINEAR: &str = r#"{"coefficients": [20.0, 160000.0, 120000.0, 2000.0, 15.0], "intercept": -2600000.0}"#;

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.onnx");

        let err = ModelLoader::new().load_model(&path).err().unwrap();

        match err {
            ModelError::ArtifactMissing { path: missing } => assert_eq!(missing, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_json_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, LINEAR).unwrap();

        let model = ModelLoader::new().load_model(&path).unwrap();

        assert_eq!(model.name(), "linear_regression");
        let output = model.predict(&FeatureVector::default()).unwrap();
        assert_eq!(output.len(), 1);
    }

    #[test]
    fn test_corrupt_onnx_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        fs::write(&path, b"definitely not a protobuf graph").unwrap();

        let err = ModelLoader::new().load_model(&path).err().unwrap();

        assert!(matches!(err, ModelError::ArtifactCorrupt { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.pkl");
        fs::write(&path, b"\x80\x04").unwrap();

        let err = ModelLoader::new().load_model(&path).err().unwrap();

        assert!(matches!(err, ModelError::ArtifactCorrupt { .. }));
    }

    #[test]
    fn test_resolve_prefers_onnx_then_json() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("best_housing_model");

        let err = resolve_artifact(&stem).unwrap_err();
        match err {
            ModelError::ArtifactMissing { path } => assert_eq!(path, stem.with_extension("onnx")),
            other => panic!("unexpected error: {other}"),
        }

        fs::write(stem.with_extension("json"), LINEAR).unwrap();
        assert_eq!(resolve_artifact(&stem).unwrap(), stem.with_extension("json"));

        fs::write(stem.with_extension("onnx"), b"").unwrap();
        assert_eq!(resolve_artifact(&stem).unwrap(), stem.with_extension("onnx"));
    }

    #[test]
    fn test_shipped_artifact_loads() {
        let stem = Path::new(env!("CARGO_MANIFEST_DIR")).join(ARTIFACT_STEM);
        let path = resolve_artifact(&stem).unwrap();

        let model = ModelLoader::new().load_model(&path).unwrap();
        let estimate = model.predict(&FeatureVector::default()).unwrap()[0];

        assert!(estimate.is_finite());
        assert!(estimate > 0.0);
    }
}
