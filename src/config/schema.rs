//! Configuration schema and defaults for claridian.
//!
//! Defines the TOML-serializable configuration structure with the sections
//! `[scoring]`, `[web]`, `[report]` and `[logging]`.
//!
//! Every field has a built-in default. Users only need to set the values
//! they want to override.

use serde::{Deserialize, Serialize};

/// Default scoring endpoint: the local scoring service.
pub const DEFAULT_SCORING_ENDPOINT: &str = "http://127.0.0.1:5000/api/assess_risk";

/// Default dashboard bind address.
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:9747";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level claridian configuration.
///
/// Maps directly to `~/.claridian/config.toml` and `.claridian.toml`. All
/// sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaridianConfig {
    pub scoring: ScoringConfig,
    pub web: WebConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [scoring]
// ---------------------------------------------------------------------------

/// External scoring service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Full URL the metrics are POSTed to.
    pub endpoint: String,
    /// Request timeout in milliseconds. `0` waits until the request settles.
    pub timeout_ms: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SCORING_ENDPOINT.to_string(),
            timeout_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Embedded dashboard server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address (`host:port`).
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
    /// Request-handling threads.
    pub workers: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WEB_ADDR.to_string(),
            open_browser: true,
            workers: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// [report]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory `claridian assess --report` writes into.
    pub output_dir: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append assessment outcomes to `~/.claridian/assessment-log.jsonl`.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl ClaridianConfig {
    /// The annotated TOML written by `claridian config init`.
    pub fn default_toml() -> &'static str {
        DEFAULT_CONFIG_TOML
    }
}

const DEFAULT_CONFIG_TOML: &str = r#"# claridian configuration
#
# Precedence (highest last): built-in defaults, ~/.claridian/config.toml,
# .claridian.toml in the working directory, CLARIDIAN_* environment variables.

[scoring]
# URL the six metrics are POSTed to.
endpoint = "http://127.0.0.1:5000/api/assess_risk"
# Request timeout in milliseconds; 0 waits until the request settles.
timeout_ms = 0

[web]
addr = "127.0.0.1:9747"
open_browser = true
workers = 4

[report]
output_dir = "."

[logging]
# Record assessment outcomes (never metric values) for `claridian stats`.
enabled = true
"#;
