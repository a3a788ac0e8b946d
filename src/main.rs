//! House Price Predictor - Main Entry Point
//!
//! Loads the housing model once, then serves predictions through either the
//! interactive terminal form or a NATS request/reply service.

use anyhow::{Context, Result};
use futures::StreamExt;
use house_price_predictor::{
    config::{AppConfig, FrontendMode, LoggingConfig},
    consumer::ValuationConsumer,
    feature_extractor::FeatureExtractor,
    form::ValuationForm,
    metrics::{MetricsReporter, PredictionMetrics},
    models::{get_model, PricePredictor},
    producer::ReplyPublisher,
    service::ValuationService,
};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    init_logging(&config.logging)?;
    info!(mode = ?config.frontend.mode, "Starting House Price Predictor");

    // The model is required before anything is served
    let model = match get_model() {
        Ok(model) => model,
        Err(e) => {
            error!(error = %e, "Model could not be loaded, refusing to serve predictions");
            eprintln!("Startup error: {}", e);
            return Err(e.into());
        }
    };
    let feature_extractor = FeatureExtractor::new();
    info!(
        "Feature extractor initialized ({} features: {:?})",
        feature_extractor.feature_count(),
        feature_extractor.feature_names()
    );

    let predictor = PricePredictor::new(model);
    info!(model = %predictor.model_name(), "Prediction pipeline ready");

    let metrics = Arc::new(PredictionMetrics::new());

    match config.frontend.mode {
        FrontendMode::Form => run_form(predictor, metrics.clone())?,
        FrontendMode::Service => run_service(&config, predictor, metrics.clone()).await?,
    }

    info!("Shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!("house_price_predictor={}", logging.level))
            .context("Invalid logging level")
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match logging.format.as_str() {
        "json" => builder.json().init(),
        "pretty" => builder.pretty().init(),
        other => {
            builder.pretty().init();
            warn!(format = %other, "Unknown log format, using pretty");
        }
    }

    Ok(())
}

fn run_form(predictor: PricePredictor, metrics: Arc<PredictionMetrics>) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut form = ValuationForm::new(stdin.lock(), stdout.lock());

    form.run(|inputs| {
        let start_time = Instant::now();
        let result = predictor.predict(inputs);
        match &result {
            Ok(prediction) => metrics.record_prediction(start_time.elapsed(), prediction.tier),
            Err(_) => metrics.record_failure(),
        }
        result
    })?;

    Ok(())
}

async fn run_service(
    config: &AppConfig,
    predictor: PricePredictor,
    metrics: Arc<PredictionMetrics>,
) -> Result<()> {
    let client = async_nats::connect(&config.nats.url)
        .await
        .with_context(|| format!("Failed to connect to NATS at {}", config.nats.url))?;
    info!("Connected to NATS at {}", config.nats.url);

    let consumer = ValuationConsumer::new(client.clone(), &config.nats.request_subject);
    let publisher = ReplyPublisher::new(client.clone());
    let service = ValuationService::new(predictor, metrics.clone());

    // Start metrics reporter
    let reporter = MetricsReporter::new(metrics, config.metrics.report_interval_secs);
    tokio::spawn(reporter.start());

    let mut subscription = consumer.subscribe().await?;
    info!(subject = %consumer.subject(), "Serving valuation requests");

    // Requests are handled one at a time, in arrival order
    while let Some(message) = subscription.next().await {
        let Some(reply_subject) = message.reply.clone() else {
            warn!(subject = %message.subject, "Valuation request without reply subject, dropping");
            continue;
        };

        let response = service.handle(&message.payload);

        if let Err(e) = publisher.reply(reply_subject, response).await {
            error!(error = %e, "Failed to publish valuation reply");
        }
    }

    Ok(())
}
