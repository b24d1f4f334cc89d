use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::assessment::{AssessError, AssessmentResult, InputSource};

// ---------------------------------------------------------------------------
// Assessment log entry (JSONL)
// ---------------------------------------------------------------------------

/// A single entry in the operational log (`~/.claridian/assessment-log.jsonl`).
///
/// Records how an assessment attempt ended, never the metric values that were
/// sent. Used by the reporter for `claridian stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentLogEntry {
    pub timestamp: String,
    /// `"sliders"` or `"text"`.
    pub source: String,
    /// `"success"`, `"server_error"`, `"transport_error"`,
    /// `"malformed_response"` or `"busy"`.
    pub outcome: String,
    /// Tier name reported by the service (successes only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub risk_level: Option<String>,
    /// HTTP status for server-reported failures.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<u16>,
    /// Round-trip time of the scoring request.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
}

impl AssessmentLogEntry {
    pub fn is_success(&self) -> bool {
        self.outcome == "success"
    }
}

// ---------------------------------------------------------------------------
// Logging functions
// ---------------------------------------------------------------------------

/// Log the outcome of a completed scoring request.
pub fn log_outcome(
    source: InputSource,
    outcome: &Result<AssessmentResult, AssessError>,
    latency_ms: u64,
) {
    let (tag, risk_level, status) = match outcome {
        Ok(result) => ("success", Some(result.risk_level.clone()), None),
        Err(e) => (e.outcome(), None, e.status()),
    };

    let entry = AssessmentLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        source: source.to_string(),
        outcome: tag.to_string(),
        risk_level,
        status,
        latency_ms: Some(latency_ms),
    };

    let _ = append_log_entry(&entry);
}

/// Log a trigger rejected because another assessment was in flight.
pub fn log_rejected(source: InputSource) {
    let entry = AssessmentLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        source: source.to_string(),
        outcome: AssessError::Busy.outcome().to_string(),
        risk_level: None,
        status: None,
        latency_ms: None,
    };

    let _ = append_log_entry(&entry);
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all entries from `~/.claridian/assessment-log.jsonl`.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_all_entries() -> Vec<AssessmentLogEntry> {
    let Some(path) = assessment_log_path() else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    parse_entries(BufReader::new(file))
}

/// Read log entries filtered to a time window (last N days).
///
/// If `days` is `None`, returns all entries.
pub fn read_entries_since_days(days: Option<u32>) -> Vec<AssessmentLogEntry> {
    let entries = read_all_entries();

    let Some(days) = days else {
        return entries;
    };

    let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
    let cutoff_str = cutoff.to_rfc3339();

    entries
        .into_iter()
        .filter(|e| e.timestamp >= cutoff_str)
        .collect()
}

fn parse_entries(reader: impl BufRead) -> Vec<AssessmentLogEntry> {
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<AssessmentLogEntry>(&line).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(entry: &AssessmentLogEntry) -> Result<()> {
    let Some(path) = assessment_log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the assessment log file.
pub fn assessment_log_path() -> Option<PathBuf> {
    crate::config::data_dir().map(|dir| dir.join("assessment-log.jsonl"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_malformed_lines() {
        let data = concat!(
            r#"{"timestamp":"2026-01-01T00:00:00Z","source":"sliders","outcome":"success","risk_level":"High","latency_ms":12}"#,
            "\n",
            "not json\n",
            r#"{"timestamp":"2026-01-02T00:00:00Z","source":"text","outcome":"server_error","status":400}"#,
            "\n",
        );
        let entries = parse_entries(data.as_bytes());
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_success());
        assert_eq!(entries[0].risk_level.as_deref(), Some("High"));
        assert_eq!(entries[1].status, Some(400));
        assert_eq!(entries[1].latency_ms, None);
    }

    #[test]
    fn entry_omits_empty_optionals() {
        let entry = AssessmentLogEntry {
            timestamp: "t".to_string(),
            source: "text".to_string(),
            outcome: "busy".to_string(),
            risk_level: None,
            status: None,
            latency_ms: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("risk_level"));
        assert!(!json.contains("latency_ms"));
    }
}
