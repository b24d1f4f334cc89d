//! Operational analytics: a best-effort JSONL log of assessment outcomes
//! (`logger`) and its aggregation for `claridian stats` (`reporter`).

pub mod logger;
pub mod reporter;
