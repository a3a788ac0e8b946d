//! Test Valuation Requester
//!
//! Sends random valuation requests to the NATS valuation service and logs
//! the replies.

use house_price_predictor::types::property::{PropertyInputs, FIELDS};
use house_price_predictor::types::valuation::{ValuationFailure, ValuationReply};
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

/// Random request generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Uniformly random inputs within every field's bounds
    fn generate(&mut self) -> PropertyInputs {
        PropertyInputs::from_values(FIELDS.map(|field| self.rng.gen_range(field.min..=field.max)))
    }

    /// Inputs with one field pushed outside its bounds, to exercise clamping
    fn generate_out_of_range(&mut self) -> PropertyInputs {
        let mut values = self.generate().values();
        let index = self.rng.gen_range(0..values.len());
        let field = FIELDS[index];
        values[index] = if self.rng.gen_bool(0.5) {
            field.max * 2.0
        } else {
            field.min - field.max
        };
        PropertyInputs::from_values(values)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_requester=info".parse()?),
        )
        .init();

    info!("Starting Test Valuation Requester");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args.get(1).map(|s| s.as_str()).unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("valuations.requests");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(20);
    let out_of_range_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        out_of_range_rate = out_of_range_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    let client = async_nats::connect(nats_url).await?;
    info!("Connected to NATS");

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();
    let mut served = 0;
    let mut failed = 0;

    for i in 0..count {
        let inputs = if rng.gen_bool(out_of_range_rate.clamp(0.0, 1.0)) {
            generator.generate_out_of_range()
        } else {
            generator.generate()
        };

        let payload = serde_json::to_vec(&inputs)?;
        let response = client.request(subject.to_string(), payload.into()).await?;

        if let Ok(reply) = serde_json::from_slice::<ValuationReply>(&response.payload) {
            served += 1;
            info!(
                request = i + 1,
                price = %reply.formatted_price,
                tier = %reply.label,
                "Valuation received"
            );
        } else {
            failed += 1;
            match serde_json::from_slice::<ValuationFailure>(&response.payload) {
                Ok(failure) => warn!(kind = %failure.kind, error = %failure.error, "Valuation failed"),
                Err(e) => warn!(error = %e, "Unrecognized reply"),
            }
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!("Completed! {} valuations served, {} failed", served, failed);

    Ok(())
}
