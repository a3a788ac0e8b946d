//! Model loading and price inference

pub mod cache;
pub mod inference;
pub mod loader;
pub mod onnx;
pub mod regressor;

pub use cache::{get_model, ModelCache};
pub use inference::{predict_price, PricePredictor};
pub use loader::{ArtifactLoader, ModelLoader};
pub use regressor::{LinearRegressor, Regressor};
