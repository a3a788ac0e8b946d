//! Valuation results and their presentation

use crate::error::ModelError;
use crate::types::property::PropertyInputs;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Estimates below this are affordable
pub const MID_RANGE_FLOOR: f64 = 500_000.0;
/// Estimates at or above this are luxury
pub const LUXURY_FLOOR: f64 = 1_000_000.0;

/// Qualitative price bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Affordable,
    MidRange,
    Luxury,
}

impl PriceTier {
    pub const ALL: [PriceTier; 3] = [PriceTier::Affordable, PriceTier::MidRange, PriceTier::Luxury];

    /// Classify an estimate. Lower bounds are inclusive.
    pub fn from_estimate(estimate: f64) -> Self {
        if estimate >= LUXURY_FLOOR {
            PriceTier::Luxury
        } else if estimate >= MID_RANGE_FLOOR {
            PriceTier::MidRange
        } else {
            PriceTier::Affordable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceTier::Affordable => "Affordable Housing",
            PriceTier::MidRange => "Mid-Range Housing",
            PriceTier::Luxury => "Luxury Housing",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PriceTier::Affordable => "💡",
            PriceTier::MidRange => "🏡",
            PriceTier::Luxury => "🏰",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            PriceTier::Affordable => 0,
            PriceTier::MidRange => 1,
            PriceTier::Luxury => 2,
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

/// A single price estimate and its tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub estimate: f64,
    pub tier: PriceTier,
}

impl PredictionResult {
    pub fn new(estimate: f64) -> Self {
        Self {
            estimate,
            tier: PriceTier::from_estimate(estimate),
        }
    }

    /// Estimate formatted as dollars with cents
    pub fn formatted_price(&self) -> String {
        format_currency(self.estimate)
    }
}

/// Reply sent for a successful valuation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationReply {
    /// Unique valuation identifier
    pub valuation_id: String,

    /// Raw model estimate
    pub estimate: f64,

    /// Estimate formatted as currency
    pub formatted_price: String,

    pub tier: PriceTier,

    /// Human-facing tier label
    pub label: String,

    /// Inputs after clamping, as fed to the model
    pub inputs: PropertyInputs,

    pub predicted_at: DateTime<Utc>,
}

impl ValuationReply {
    pub fn new(result: &PredictionResult, inputs: PropertyInputs) -> Self {
        Self {
            valuation_id: uuid::Uuid::new_v4().to_string(),
            estimate: result.estimate,
            formatted_price: result.formatted_price(),
            tier: result.tier,
            label: result.tier.label().to_string(),
            inputs,
            predicted_at: Utc::now(),
        }
    }
}

/// Reply sent when a valuation request could not be served
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationFailure {
    pub error: String,
    pub kind: String,
}

impl ValuationFailure {
    pub fn bad_request(reason: impl ToString) -> Self {
        Self {
            error: reason.to_string(),
            kind: "bad_request".to_string(),
        }
    }
}

impl From<&ModelError> for ValuationFailure {
    fn from(err: &ModelError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }
    }
}

/// Format an amount as `$1,234,567.89`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}${}.{:02}",
        sign,
        group_thousands(cents / 100),
        cents % 100
    )
}

/// Format a whole number with thousands separators, e.g. `30,000`
pub fn format_thousands(value: f64) -> String {
    let whole = value.abs().round() as u64;
    let sign = if value < 0.0 && whole > 0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(whole))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(PriceTier::from_estimate(499_999.99), PriceTier::Affordable);
        assert_eq!(PriceTier::from_estimate(500_000.0), PriceTier::MidRange);
        assert_eq!(PriceTier::from_estimate(999_999.99), PriceTier::MidRange);
        assert_eq!(PriceTier::from_estimate(1_000_000.0), PriceTier::Luxury);
        assert_eq!(PriceTier::from_estimate(-10.0), PriceTier::Affordable);
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(PriceTier::Affordable.label(), "Affordable Housing");
        assert_eq!(PriceTier::MidRange.to_string(), "🏡 Mid-Range Housing");
        assert_eq!(PriceTier::Luxury.label(), "Luxury Housing");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(750_000.0), "$750,000.00");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(999.5), "$999.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-1_500.25), "-$1,500.25");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(30_000.0), "30,000");
        assert_eq!(format_thousands(100.0), "100");
        assert_eq!(format_thousands(1_000_000.0), "1,000,000");
    }

    #[test]
    fn test_reply_serialization() {
        let result = PredictionResult::new(750_000.0);
        let reply = ValuationReply::new(&result, PropertyInputs::default());

        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["tier"], "mid_range");
        assert_eq!(json["formatted_price"], "$750,000.00");
        assert_eq!(json["label"], "Mid-Range Housing");
        assert_eq!(json["inputs"]["number_of_bedrooms"], 3.0);
    }

    #[test]
    fn test_failure_from_model_error() {
        let failure = ValuationFailure::from(&ModelError::ModelUnavailable);
        assert_eq!(failure.kind, "model_unavailable");
    }
}
