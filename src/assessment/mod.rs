//! Assessment orchestration: input collection and the scoring boundary.
//!
//! All risk computation lives in an external scoring service. This module
//! defines what is sent to it ([`MetricInput`]), what comes back
//! ([`AssessmentResult`]), how failures are classified ([`AssessError`]), and
//! the [`ScoringService`] seam that the HTTP client ([`client::ScoringClient`])
//! and test doubles implement.
//!
//! The stateful half of orchestration (in-flight guard, "assessment has run"
//! flag, last result) lives on [`crate::session::Session`].

pub mod client;
pub mod metrics;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use metrics::{MetricField, MetricInput, NonFiniteMetric};

use crate::risk::RiskTier;

// ---------------------------------------------------------------------------
// Request side
// ---------------------------------------------------------------------------

/// Where the metric values for an assessment come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    Sliders,
    Text,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sliders => write!(f, "sliders"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// One assessment trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentRequest {
    /// Use the current slider values.
    Sliders,
    /// Run the length heuristic over clinician text.
    Text(String),
}

impl AssessmentRequest {
    pub fn source(&self) -> InputSource {
        match self {
            Self::Sliders => InputSource::Sliders,
            Self::Text(_) => InputSource::Text,
        }
    }

    /// Resolve the request into the payload sent to the scoring service.
    pub fn resolve(&self, sliders: &MetricInput) -> MetricInput {
        match self {
            Self::Sliders => *sliders,
            Self::Text(text) => MetricInput::from_text_heuristic(text),
        }
    }
}

// ---------------------------------------------------------------------------
// Response side
// ---------------------------------------------------------------------------

/// Successful response from the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub risk_score: f64,
    /// Tier name as reported by the service.
    pub risk_level: String,
    #[serde(rename = "triggered_fuzzy_rules", default)]
    pub triggered_rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation_text: Option<String>,
}

impl AssessmentResult {
    /// Tier parsed from the service's `risk_level`, if recognized.
    pub fn reported_tier(&self) -> Option<RiskTier> {
        RiskTier::from_level_name(&self.risk_level)
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why an assessment did not produce a result. Each is terminal for the
/// invocation; none are retried.
#[derive(Debug, Error)]
pub enum AssessError {
    /// Another assessment is still in flight for this session.
    #[error("an assessment is already in progress")]
    Busy,
    /// The service answered with a non-2xx status.
    #[error("Error from server: {message}")]
    Server { status: u16, message: String },
    /// The request could not complete.
    #[error("Failed to connect to the scoring service at {endpoint}. Ensure it is running.")]
    Transport { endpoint: String, detail: String },
    /// 2xx status with a body that is not a valid result.
    #[error("scoring service returned an unreadable response: {0}")]
    MalformedResponse(String),
}

impl AssessError {
    /// Outcome tag recorded in the assessment log.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Busy => "busy",
            Self::Server { .. } => "server_error",
            Self::Transport { .. } => "transport_error",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Service seam
// ---------------------------------------------------------------------------

/// Anything that can score a [`MetricInput`].
pub trait ScoringService: Send + Sync {
    fn assess(&self, input: &MetricInput) -> Result<AssessmentResult, AssessError>;

    /// Endpoint description for diagnostics.
    fn endpoint(&self) -> &str;
}
