//! Prediction statistics for the valuation front ends.

use crate::types::valuation::PriceTier;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for served predictions
pub struct PredictionMetrics {
    /// Total successful predictions
    pub predictions: AtomicU64,
    /// Total failed predictions (model errors and bad requests)
    pub failures: AtomicU64,
    /// Predictions per tier, indexed like `PriceTier::ALL`
    by_tier: [AtomicU64; 3],
    /// Prediction latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PredictionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            by_tier: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
            latencies: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, latency: Duration, tier: PriceTier) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        self.by_tier[tier.index()].fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.latencies.write() {
            times.push(latency.as_micros() as u64);
            // Keep only last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Record a failed prediction
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of predictions that landed in `tier`
    pub fn tier_count(&self, tier: PriceTier) -> u64 {
        self.by_tier[tier.index()].load(Ordering::Relaxed)
    }

    /// Get latency statistics
    pub fn get_latency_stats(&self) -> LatencyStats {
        let times = match self.latencies.read() {
            Ok(times) => times,
            Err(poisoned) => poisoned.into_inner(),
        };
        if times.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: sorted[count - 1],
        }
    }

    /// Get current throughput (predictions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let predictions = self.predictions.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let latency = self.get_latency_stats();

        info!(
            predictions,
            failures,
            throughput = format!("{:.2} req/s", self.get_throughput()),
            "Prediction summary"
        );
        info!(
            mean_us = latency.mean_us,
            p50_us = latency.p50_us,
            p95_us = latency.p95_us,
            p99_us = latency.p99_us,
            max_us = latency.max_us,
            "Prediction latency"
        );
        for tier in PriceTier::ALL {
            let count = self.tier_count(tier);
            let pct = if predictions > 0 {
                (count as f64 / predictions as f64) * 100.0
            } else {
                0.0
            };
            info!(tier = tier.label(), count, share = format!("{:.1}%", pct), "Tier distribution");
        }
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency statistics
#[derive(Debug, Default)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Prints periodic metrics summaries
pub struct MetricsReporter {
    metrics: Arc<PredictionMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<PredictionMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs: interval_secs.max(1),
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PredictionMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), PriceTier::Affordable);
        metrics.record_prediction(Duration::from_micros(300), PriceTier::Luxury);
        metrics.record_prediction(Duration::from_micros(200), PriceTier::Luxury);
        metrics.record_failure();

        assert_eq!(metrics.predictions.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.failures.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.tier_count(PriceTier::Affordable), 1);
        assert_eq!(metrics.tier_count(PriceTier::MidRange), 0);
        assert_eq!(metrics.tier_count(PriceTier::Luxury), 2);
    }

    #[test]
    fn test_latency_stats() {
        let metrics = PredictionMetrics::new();
        assert_eq!(metrics.get_latency_stats().count, 0);

        for us in [100, 200, 300, 400] {
            metrics.record_prediction(Duration::from_micros(us), PriceTier::MidRange);
        }

        let stats = metrics.get_latency_stats();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean_us, 250);
        assert_eq!(stats.p50_us, 300);
        assert_eq!(stats.max_us, 400);
    }
}
