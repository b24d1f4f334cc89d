//! Plain-text assessment report.
//!
//! A report can only be produced after a successful assessment; before that
//! the request is rejected with a warning and nothing is written.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use thiserror::Error;

use crate::assessment::AssessmentResult;
use crate::session::Session;

pub const NO_ASSESSMENT_WARNING: &str = "Please run an assessment before generating a report.";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Please run an assessment before generating a report.")]
    NoAssessment,
    #[error("failed to write report to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A generated report, ready to be offered as a download or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub file_name: String,
    pub content: String,
}

/// Build the report for the last successful assessment in `session`.
pub fn generate_report<Tz>(session: &Session, now: &DateTime<Tz>) -> Result<Report, ReportError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let result = session.last_result().ok_or(ReportError::NoAssessment)?;
    Ok(render(result, now))
}

/// Report for the current local time.
pub fn generate_report_now(session: &Session) -> Result<Report, ReportError> {
    generate_report(session, &Local::now())
}

fn render<Tz>(result: &AssessmentResult, now: &DateTime<Tz>) -> Report
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let level = if result.risk_level.is_empty() {
        "Unknown"
    } else {
        result.risk_level.as_str()
    };

    let content = format!(
        "CLARIDIAN Psychosis Risk Assessment Report\n\n\
         Date: {date}\n\
         Risk Score: {score}%\n\
         Risk Level: {level}\n\n\
         This is a mock analysis report. \
         The assessment summary is provided above.",
        date = now.format("%m/%d/%Y - %I:%M %p"),
        score = result.risk_score,
    );

    Report {
        file_name: format!(
            "CLARIDIAN_Report_{}_{}.txt",
            sanitize_file_component(level),
            now.format("%Y-%m-%d")
        ),
        content,
    }
}

/// Keep the tier name safe to use inside a file name.
fn sanitize_file_component(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

impl Report {
    /// Write the report into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        let path = dir.join(&self.file_name);
        fs::create_dir_all(dir)
            .and_then(|_| fs::write(&path, &self.content))
            .map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
