//! Operation timing port.

use std::time::Duration;

/// Whether a timed operation succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "true",
            Outcome::Failure => "false",
        }
    }
}

/// Receives one sample per timed store operation.
pub trait OperationRecorder: Send + Sync {
    fn record(&self, operation: &'static str, outcome: Outcome, elapsed: Duration);
}

/// Recorder that drops every sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecorder;

impl OperationRecorder for NoopRecorder {
    fn record(&self, _operation: &'static str, _outcome: Outcome, _elapsed: Duration) {}
}
