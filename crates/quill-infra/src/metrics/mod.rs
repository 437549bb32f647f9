//! Store response-time metrics.

mod prometheus;

pub use self::prometheus::{DatabaseMetrics, MetricsError};
