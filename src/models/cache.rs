//! Process-wide model cache

use crate::error::Result;
use crate::models::loader::{resolve_artifact, ArtifactLoader, ModelLoader, ARTIFACT_STEM};
use crate::models::regressor::Regressor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, info};

/// Where a cache finds its artifact
#[derive(Debug, Clone)]
enum ArtifactSource {
    /// An exact file
    File(PathBuf),
    /// A stem probed with each supported extension
    Stem(PathBuf),
}

/// Load-once holder for a model.
///
/// The first successful `get` loads the artifact; every later call hands out
/// the same `Arc` without touching the filesystem. A failed load leaves the
/// cache empty.
pub struct ModelCache {
    source: ArtifactSource,
    loader: Box<dyn ArtifactLoader>,
    model: OnceLock<Arc<dyn Regressor>>,
    /// Serializes the first load so concurrent callers never load twice
    init: Mutex<()>,
    loads: AtomicUsize,
}

impl ModelCache {
    /// Cache for the artifact at an exact path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self::with_loader(path, Box::new(ModelLoader::new()))
    }

    /// Cache for an exact path with a custom loader
    pub fn with_loader<P: Into<PathBuf>>(path: P, loader: Box<dyn ArtifactLoader>) -> Self {
        Self::from_source(ArtifactSource::File(path.into()), loader)
    }

    /// Cache for the fixed artifact location under `root`
    pub fn at_default_location<P: AsRef<Path>>(root: P) -> Self {
        Self::from_source(
            ArtifactSource::Stem(root.as_ref().join(ARTIFACT_STEM)),
            Box::new(ModelLoader::new()),
        )
    }

    fn from_source(source: ArtifactSource, loader: Box<dyn ArtifactLoader>) -> Self {
        Self {
            source,
            loader,
            model: OnceLock::new(),
            init: Mutex::new(()),
            loads: AtomicUsize::new(0),
        }
    }

    /// The process-wide cache for the fixed artifact location, relative to
    /// the working directory
    pub fn global() -> &'static ModelCache {
        static GLOBAL: OnceLock<ModelCache> = OnceLock::new();
        GLOBAL.get_or_init(|| ModelCache::at_default_location(""))
    }

    /// Get the model, loading it on first use
    pub fn get(&self) -> Result<Arc<dyn Regressor>> {
        if let Some(model) = self.model.get() {
            return Ok(model.clone());
        }

        // A poisoned guard only means another loader panicked; the cell is
        // still consistent.
        let _guard = self.init.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(model) = self.model.get() {
            return Ok(model.clone());
        }

        let path = match &self.source {
            ArtifactSource::File(path) => path.clone(),
            ArtifactSource::Stem(stem) => resolve_artifact(stem)?,
        };

        debug!(path = %path.display(), "Model not cached, loading artifact");
        let model = self.loader.load(&path)?;
        self.loads.fetch_add(1, Ordering::Relaxed);
        info!(model = %model.name(), path = %path.display(), "Model cached for process lifetime");

        Ok(self.model.get_or_init(|| model).clone())
    }

    /// The model if it has already been loaded; never touches the filesystem
    pub fn loaded(&self) -> Option<Arc<dyn Regressor>> {
        self.model.get().cloned()
    }

    /// Number of artifact loads performed (0 or 1)
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

/// Get the process-wide model, loading it from the fixed location on first use
pub fn get_model() -> Result<Arc<dyn Regressor>> {
    ModelCache::global().get()
}
