//! Analytics reporter: aggregation of the assessment log.
//!
//! Reads the JSONL assessment log and provides:
//! - **Stats**: outcome distribution, tier distribution, average latency
//! - **Trends**: attempts and successes per day

use std::collections::{BTreeMap, HashMap};

use crate::analytics::logger::{self, AssessmentLogEntry};

// ---------------------------------------------------------------------------
// Aggregated stats
// ---------------------------------------------------------------------------

/// Summary statistics for `claridian stats`.
#[derive(Debug)]
pub struct Stats {
    pub total_attempts: usize,
    pub outcomes: OutcomeDistribution,
    /// Successes per reported tier name, sorted by name.
    pub tiers: BTreeMap<String, usize>,
    /// Mean latency over attempts that reached the service.
    pub avg_latency_ms: Option<f64>,
    pub by_source: Vec<SourceStat>,
}

/// How attempts ended.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OutcomeDistribution {
    pub success: usize,
    pub server_error: usize,
    pub transport_error: usize,
    pub malformed_response: usize,
    pub busy: usize,
}

impl OutcomeDistribution {
    pub fn total(&self) -> usize {
        self.success + self.server_error + self.transport_error + self.malformed_response + self.busy
    }

    /// Percentage for a given count, returns 0.0 if total is zero.
    pub fn pct(&self, count: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (count as f64 / total as f64) * 100.0
        }
    }

    fn record(&mut self, outcome: &str) {
        match outcome {
            "success" => self.success += 1,
            "server_error" => self.server_error += 1,
            "transport_error" => self.transport_error += 1,
            "malformed_response" => self.malformed_response += 1,
            "busy" => self.busy += 1,
            _ => {}
        }
    }
}

/// Per-input-source counts.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStat {
    pub source: String,
    pub attempts: usize,
    pub successes: usize,
}

/// A single data point in a time-based trend.
#[derive(Debug, Clone)]
pub struct TrendEntry {
    pub date: String,
    pub attempts: usize,
    pub successes: usize,
    pub avg_latency_ms: Option<f64>,
}

// ---------------------------------------------------------------------------
// Stats computation
// ---------------------------------------------------------------------------

/// Compute aggregate stats from the log, optionally filtered to the last
/// `days` days.
pub fn compute_stats(days: Option<u32>) -> Stats {
    let entries = logger::read_entries_since_days(days);
    build_stats(&entries)
}

fn build_stats(entries: &[AssessmentLogEntry]) -> Stats {
    let mut outcomes = OutcomeDistribution::default();
    let mut tiers: BTreeMap<String, usize> = BTreeMap::new();
    let mut sources: HashMap<&str, SourceStat> = HashMap::new();

    for entry in entries {
        outcomes.record(&entry.outcome);

        if entry.is_success()
            && let Some(level) = &entry.risk_level
        {
            *tiers.entry(level.clone()).or_default() += 1;
        }

        let stat = sources
            .entry(entry.source.as_str())
            .or_insert_with(|| SourceStat {
                source: entry.source.clone(),
                attempts: 0,
                successes: 0,
            });
        stat.attempts += 1;
        if entry.is_success() {
            stat.successes += 1;
        }
    }

    let mut by_source: Vec<SourceStat> = sources.into_values().collect();
    by_source.sort_by(|a, b| b.attempts.cmp(&a.attempts).then(a.source.cmp(&b.source)));

    Stats {
        total_attempts: entries.len(),
        outcomes,
        tiers,
        avg_latency_ms: average_latency(entries.iter()),
        by_source,
    }
}

fn average_latency<'a>(entries: impl Iterator<Item = &'a AssessmentLogEntry>) -> Option<f64> {
    let latencies: Vec<u64> = entries.filter_map(|e| e.latency_ms).collect();
    if latencies.is_empty() {
        None
    } else {
        Some(latencies.iter().sum::<u64>() as f64 / latencies.len() as f64)
    }
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

/// Compute daily trend data over the last `days` days.
pub fn compute_trends(days: u32) -> Vec<TrendEntry> {
    let entries = logger::read_entries_since_days(Some(days));
    build_trends(&entries)
}

fn build_trends(entries: &[AssessmentLogEntry]) -> Vec<TrendEntry> {
    // Group by date (YYYY-MM-DD); BTreeMap keeps them ascending
    let mut daily: BTreeMap<String, Vec<&AssessmentLogEntry>> = BTreeMap::new();
    for entry in entries {
        let date = entry.timestamp.get(..10).unwrap_or("unknown").to_string();
        daily.entry(date).or_default().push(entry);
    }

    daily
        .into_iter()
        .map(|(date, group)| TrendEntry {
            date,
            attempts: group.len(),
            successes: group.iter().filter(|e| e.is_success()).count(),
            avg_latency_ms: average_latency(group.into_iter()),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
