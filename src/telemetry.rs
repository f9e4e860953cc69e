//! Logging and metrics.
//!
//! Structured logging via `tracing` with snake_case event names; Prometheus
//! counters and histograms for requests, records, durations, validation
//! errors, and coherence scores. The metrics handle is process-wide and
//! safe to share across requests.

use prometheus::{
    histogram_opts, opts, Encoder, HistogramVec, IntCounter, IntCounterVec, Registry, TextEncoder,
};

use crate::config::Settings;

/// Install the global tracing subscriber.
///
/// Log level comes from `LOG_LEVEL` (overridable via `RUST_LOG`);
/// non-development environments log JSON lines.
pub fn init_tracing(settings: &Settings) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(settings.log_level.to_lowercase()));

    if settings.environment == "development" {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// Process-wide metrics collector.
pub struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    generation_duration_seconds: HistogramVec,
    records_generated: IntCounterVec,
    validation_errors_total: IntCounterVec,
    cache_hits_total: IntCounter,
    coherence_score: HistogramVec,
}

impl Metrics {
    /// Build and register the metric families.
    pub fn new() -> Self {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            opts!(
                "testdata_requests_total",
                "Total number of test data generation requests"
            ),
            &["path", "domain", "entity", "status"],
        )
        .expect("valid metric definition");

        let generation_duration_seconds = HistogramVec::new(
            histogram_opts!(
                "testdata_generation_duration_seconds",
                "Time spent generating test data",
                vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]
            ),
            &["path"],
        )
        .expect("valid metric definition");

        let records_generated = IntCounterVec::new(
            opts!(
                "testdata_records_generated",
                "Total number of test data records generated"
            ),
            &["domain", "entity"],
        )
        .expect("valid metric definition");

        let validation_errors_total = IntCounterVec::new(
            opts!(
                "testdata_validation_errors_total",
                "Total number of validation errors"
            ),
            &["domain", "entity"],
        )
        .expect("valid metric definition");

        let cache_hits_total = IntCounter::with_opts(opts!(
            "testdata_cache_hits_total",
            "Total number of cache hits"
        ))
        .expect("valid metric definition");

        let coherence_score = HistogramVec::new(
            histogram_opts!(
                "testdata_coherence_score",
                "Coherence score of generated data",
                vec![0.5, 0.6, 0.7, 0.8, 0.9, 0.95, 1.0]
            ),
            &["domain"],
        )
        .expect("valid metric definition");

        for collector in [
            Box::new(requests_total.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(generation_duration_seconds.clone()),
            Box::new(records_generated.clone()),
            Box::new(validation_errors_total.clone()),
            Box::new(cache_hits_total.clone()),
            Box::new(coherence_score.clone()),
        ] {
            registry
                .register(collector)
                .expect("metric registration is unique");
        }

        Self {
            registry,
            requests_total,
            generation_duration_seconds,
            records_generated,
            validation_errors_total,
            cache_hits_total,
            coherence_score,
        }
    }

    /// Record one generation request.
    pub fn record_request(
        &self,
        path: &str,
        domain: &str,
        entity: &str,
        status: &str,
        duration_seconds: f64,
    ) {
        self.requests_total
            .with_label_values(&[path, domain, entity, status])
            .inc();
        self.generation_duration_seconds
            .with_label_values(&[path])
            .observe(duration_seconds);
    }

    /// Record generated record count.
    pub fn record_records_generated(&self, domain: &str, entity: &str, count: u64) {
        self.records_generated
            .with_label_values(&[domain, entity])
            .inc_by(count);
    }

    /// Record a validation error.
    pub fn record_validation_error(&self, domain: &str, entity: &str) {
        self.validation_errors_total
            .with_label_values(&[domain, entity])
            .inc();
    }

    /// Record a cache hit.
    pub fn record_cache_hit(&self) {
        self.cache_hits_total.inc();
    }

    /// Record a coherence score observation.
    pub fn record_coherence_score(&self, domain: &str, score: f64) {
        self.coherence_score
            .with_label_values(&[domain])
            .observe(score);
    }

    /// Render the Prometheus text exposition.
    pub fn gather(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if encoder
            .encode(&self.registry.gather(), &mut buffer)
            .is_err()
        {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_round_trip() {
        let metrics = Metrics::new();
        metrics.record_request("synthetic", "ecommerce", "cart", "success", 0.2);
        metrics.record_records_generated("ecommerce", "cart", 10);
        metrics.record_validation_error("ecommerce", "cart");
        metrics.record_cache_hit();
        metrics.record_coherence_score("ecommerce", 0.92);

        let text = metrics.gather();
        assert!(text.contains("testdata_requests_total"));
        assert!(text.contains("testdata_records_generated"));
        assert!(text.contains("testdata_coherence_score"));
        assert!(text.contains("path=\"synthetic\""));
    }

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.record_records_generated("ecommerce", "user", 3);
        metrics.record_records_generated("ecommerce", "user", 4);
        let text = metrics.gather();
        assert!(text.contains("testdata_records_generated{domain=\"ecommerce\",entity=\"user\"} 7"));
    }
}
