//! Type definitions for property valuation

pub mod property;
pub mod valuation;

pub use property::{FieldSpec, PropertyInputs, FIELDS};
pub use valuation::{PredictionResult, PriceTier, ValuationFailure, ValuationReply};
