//! House Price Predictor Library
//!
//! Estimates a house price from five area attributes with a pre-trained
//! regression model and labels it affordable, mid-range or luxury.

pub mod config;
pub mod consumer;
pub mod error;
pub mod feature_extractor;
pub mod form;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod service;
pub mod types;

pub use config::AppConfig;
pub use consumer::ValuationConsumer;
pub use error::ModelError;
pub use feature_extractor::{FeatureExtractor, FeatureVector};
pub use form::ValuationForm;
pub use models::{get_model, predict_price, ModelCache, PricePredictor};
pub use producer::ReplyPublisher;
pub use service::ValuationService;
pub use types::{PredictionResult, PriceTier, PropertyInputs};
