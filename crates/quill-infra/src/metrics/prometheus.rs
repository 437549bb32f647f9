//! Prometheus recorder for store operations.
//!
//! Exposes a single histogram, `db_response_time_duration_seconds`, labelled
//! by `operation` and `success`.

use std::time::Duration;

use prometheus::{Encoder, HistogramOpts, HistogramVec, Registry, TextEncoder};
use thiserror::Error;

use quill_core::ports::{OperationRecorder, Outcome};

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to register metric: {0}")]
    RegistrationFailed(#[from] prometheus::Error),

    #[error("failed to encode metrics: {0}")]
    EncodingFailed(String),
}

/// Histogram of store response times with its own registry.
#[derive(Clone)]
pub struct DatabaseMetrics {
    registry: Registry,
    response_time: HistogramVec,
}

impl DatabaseMetrics {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let response_time = HistogramVec::new(
            HistogramOpts::new(
                "db_response_time_duration_seconds",
                "Database response time in seconds",
            ),
            &["operation", "success"],
        )?;
        registry.register(Box::new(response_time.clone()))?;

        Ok(Self {
            registry,
            response_time,
        })
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| MetricsError::EncodingFailed(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| MetricsError::EncodingFailed(e.to_string()))
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

impl OperationRecorder for DatabaseMetrics {
    fn record(&self, operation: &'static str, outcome: Outcome, elapsed: Duration) {
        self.response_time
            .with_label_values(&[operation, outcome.as_str()])
            .observe(elapsed.as_secs_f64());
    }
}
