//! Scoring service HTTP client.
//!
//! Sends one `POST` with the six metrics as JSON to the configured endpoint
//! using the synchronous `ureq` client. No retries, no streaming: one
//! request, one response. Any non-2xx status is a failure; its `error` field
//! (if readable) is surfaced verbatim.

use std::time::Duration;

use crate::config::schema::ScoringConfig;

use super::{AssessError, AssessmentResult, ErrorBody, MetricInput, ScoringService};

/// Synchronous client for the external scoring endpoint.
#[derive(Debug, Clone)]
pub struct ScoringClient {
    endpoint: String,
    /// `None` waits for the request to settle however long it takes.
    timeout: Option<Duration>,
}

impl ScoringClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(&config.endpoint, config.timeout_ms)
    }

    pub fn new(endpoint: &str, timeout_ms: u64) -> Self {
        Self {
            endpoint: endpoint.trim().to_string(),
            timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
        }
    }

    /// Whether anything answers HTTP at the endpoint.
    ///
    /// Any status (including 405 for the `GET`) counts as reachable; only
    /// transport failures do not.
    pub fn is_reachable(&self) -> bool {
        let result = ureq::get(&self.endpoint)
            .timeout(Duration::from_secs(5))
            .call();
        match result {
            Ok(_) | Err(ureq::Error::Status(..)) => true,
            Err(ureq::Error::Transport(_)) => false,
        }
    }

    fn transport_error(&self, detail: impl ToString) -> AssessError {
        AssessError::Transport {
            endpoint: self.endpoint.clone(),
            detail: detail.to_string(),
        }
    }
}

impl ScoringService for ScoringClient {
    fn assess(&self, input: &MetricInput) -> Result<AssessmentResult, AssessError> {
        let mut request = ureq::post(&self.endpoint);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        match request.send_json(input) {
            Ok(resp) => resp
                .into_json::<AssessmentResult>()
                .map_err(|e| AssessError::MalformedResponse(e.to_string())),
            Err(ureq::Error::Status(status, resp)) => {
                let message = resp
                    .into_json::<ErrorBody>()
                    .map(|body| body.error)
                    .unwrap_or_else(|_| format!("HTTP {status}"));
                Err(AssessError::Server { status, message })
            }
            Err(ureq::Error::Transport(t)) => Err(self.transport_error(t)),
        }
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
