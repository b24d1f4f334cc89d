//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `claridian assess`: score sliders or a note, print the dashboard
//! - `claridian classify <score>`: tier lookup
//! - `claridian timeline --tier T`: care-plan geometry
//! - `claridian serve`: web dashboard
//! - `claridian health`: config, scoring endpoint, log file
//! - `claridian stats` / `trends`: assessment log summaries
//! - `claridian config show|init|set|reset`: configuration management

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::{ColoredString, Colorize};

use crate::analytics::logger;
use crate::analytics::reporter::{self, Stats, TrendEntry};
use crate::assessment::client::ScoringClient;
use crate::assessment::{AssessmentRequest, MetricField};
use crate::config;
use crate::dashboard::DashboardView;
use crate::report;
use crate::risk::{self, RiskTier};
use crate::session::Session;
use crate::timeline::{self, ItemCategory, Lane, TimelineLayout};
use crate::web;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// claridian assess
// ---------------------------------------------------------------------------

/// Arguments for `claridian assess`.
#[derive(Debug, Clone, Default, Args)]
pub struct AssessArgs {
    /// Suspiciousness (0-10)
    #[arg(long)]
    pub suspiciousness: Option<f64>,
    /// Acoustic coherence (0-10)
    #[arg(long)]
    pub coherence: Option<f64>,
    /// Sleep quality (0-10)
    #[arg(long)]
    pub sleep: Option<f64>,
    /// Social withdrawal (0-10)
    #[arg(long)]
    pub social_withdrawal: Option<f64>,
    /// Attention (0-10)
    #[arg(long)]
    pub attention: Option<f64>,
    /// Role functioning (0-10)
    #[arg(long)]
    pub functioning: Option<f64>,
    /// Assess a clinician note instead of the sliders
    #[arg(long, conflicts_with_all = [
        "suspiciousness", "coherence", "sleep", "social_withdrawal", "attention", "functioning"
    ])]
    pub text: Option<String>,
    /// Write the text report after a successful assessment
    #[arg(long)]
    pub report: bool,
    /// Directory for the report (default from config)
    #[arg(long, requires = "report")]
    pub out: Option<PathBuf>,
    /// Output format: table (default), json
    #[arg(long, default_value = "table")]
    pub format: String,
}

impl AssessArgs {
    fn slider_values(&self) -> [(MetricField, Option<f64>); 6] {
        [
            (MetricField::Suspiciousness, self.suspiciousness),
            (MetricField::Coherence, self.coherence),
            (MetricField::Sleep, self.sleep),
            (MetricField::SocialWithdrawal, self.social_withdrawal),
            (MetricField::Attention, self.attention),
            (MetricField::Functioning, self.functioning),
        ]
    }

    /// Build the session and trigger described by the flags.
    fn prepare(&self, session: &mut Session) -> Result<AssessmentRequest> {
        for (field, value) in self.slider_values() {
            if let Some(v) = value {
                session
                    .set_metric(field, v)
                    .with_context(|| format!("invalid --{}", field.key().replace('_', "-")))?;
            }
        }
        Ok(match &self.text {
            Some(text) => AssessmentRequest::Text(text.clone()),
            None => AssessmentRequest::Sliders,
        })
    }
}

/// Run one assessment against the configured scoring service.
pub fn run_assess(args: &AssessArgs) -> Result<()> {
    let cfg = config::load();
    let client = ScoringClient::from_config(&cfg.scoring);
    let mut session = Session::with_logging(cfg.logging.enabled);
    let request = args.prepare(&mut session)?;
    let format = OutputFormat::from_str_opt(Some(&args.format));

    if format == OutputFormat::Table {
        if let AssessmentRequest::Text(_) = request {
            println!(
                "{}",
                "Simulating assessment based on text analysis. Using inputs for 6 metrics.".dimmed()
            );
        }
        println!("{}", "Assessing...".dimmed());
    }

    let result = session
        .run_assessment(&request, &client)
        .context("assessment failed")?;

    let view = DashboardView::from_result(&result);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        _ => print_dashboard(&view),
    }

    if args.report {
        let dir = args
            .out
            .clone()
            .unwrap_or_else(|| PathBuf::from(&cfg.report.output_dir));
        let path = report::generate_report_now(&session)?.write_to(&dir)?;
        println!(
            "{} {} Risk Report written to {}",
            "✓".green().bold(),
            result.risk_level,
            path.display()
        );
    }

    Ok(())
}

fn print_dashboard(view: &DashboardView) {
    println!();
    println!("{}", "CLARIDIAN Risk Assessment".bold().cyan());
    println!("{}", "=".repeat(60));
    println!(
        "  {} {}",
        "Risk score:".bold(),
        colorize_role(&format!("{}% ({})", view.gauge.value.round(), view.gauge.label), view.gauge.color_role)
    );
    if let Some(text) = &view.interpretation {
        println!("  {}", text.dimmed());
    }
    println!();

    println!("{}", "Triggered Rules".bold().cyan());
    if view.triggered_rules.is_empty() {
        println!("  {}", "none reported".dimmed());
    }
    for rule in &view.triggered_rules {
        println!("  • {rule}");
    }
    println!();

    if let Some(plan) = &view.action_plan {
        println!("{}", "Action Plan".bold().cyan());
        println!("  {}", colorize_role(plan.message, view.gauge.color_role));
        println!();
    }

    print_timeline_table(&view.timeline);
}

// ---------------------------------------------------------------------------
// claridian classify
// ---------------------------------------------------------------------------

pub fn run_classify(score: f64) -> Result<()> {
    let class = risk::classify(score);
    println!(
        "  {} {}",
        "Tier:".bold(),
        colorize_role(class.tier.name(), class.color_role)
    );
    println!("  {} {}", "Gauge:".bold(), class.gauge_label);
    println!("  {} {}", "Next:".bold(), class.next_step_message);
    Ok(())
}

// ---------------------------------------------------------------------------
// claridian timeline
// ---------------------------------------------------------------------------

pub fn run_timeline(tier: Option<&str>, format: OutputFormat) -> Result<()> {
    let tier = match tier {
        None | Some("none") => None,
        Some(name) => Some(
            RiskTier::from_level_name(name)
                .with_context(|| format!("unknown tier '{name}' (expected low, moderate, high)"))?,
        ),
    };

    let layout = timeline::layout_timeline(tier);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&layout)?),
        OutputFormat::Csv => print_timeline_csv(&layout),
        OutputFormat::Table => print_timeline_table(&layout),
    }
    Ok(())
}

fn print_timeline_table(layout: &TimelineLayout) {
    let title = match layout.tier {
        Some(tier) => format!("Daily Care Plan — {} Risk", tier.name()),
        None => "Daily Care Plan".to_string(),
    };
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(60));

    if layout.items.is_empty() {
        println!("  {}", "No plan yet. Run an assessment to generate one.".yellow());
        return;
    }

    println!(
        "  {:<10} {:<7} {:>9}  Activity",
        "Time", "Lane", "Offset"
    );
    println!("  {}", "-".repeat(58));
    for item in &layout.items {
        let lane = match item.lane {
            Lane::Top => "top",
            Lane::Bottom => "bottom",
        };
        println!(
            "  {:<10} {:<7} {:>7.1}px  {}",
            item.start_label,
            lane,
            item.x_offset_px,
            colorize_category(item.label, item.category),
        );
    }
    println!();
    println!(
        "  {}",
        format!(
            "{} ticks across {}px; cards are {}px wide.",
            layout.ticks.len(),
            layout.width_px,
            timeline::CARD_WIDTH_PX
        )
        .dimmed()
    );
}

fn print_timeline_csv(layout: &TimelineLayout) {
    println!("start_minute,start_label,lane,x_offset_px,width_px,category,label");
    for item in &layout.items {
        println!(
            "{},{},{:?},{},{},{:?},\"{}\"",
            item.start_minute,
            item.start_label,
            item.lane,
            item.x_offset_px,
            item.width_px,
            item.category,
            item.label,
        );
    }
}

// ---------------------------------------------------------------------------
// claridian serve
// ---------------------------------------------------------------------------

pub fn run_serve(addr: Option<&str>, no_browser: bool) -> Result<()> {
    let mut cfg = config::load();
    if let Some(addr) = addr {
        cfg.web.addr = addr.to_string();
    }
    if no_browser {
        cfg.web.open_browser = false;
    }
    web::serve(&cfg)
}

// ---------------------------------------------------------------------------
// claridian health
// ---------------------------------------------------------------------------

/// Check config files, scoring endpoint reachability and the log file.
pub fn run_health() -> Result<()> {
    println!("{}", "CLARIDIAN Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.claridian/config.toml found"
        } else {
            "not found (run `claridian config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".claridian.toml found"
        } else {
            "none (optional)"
        },
    );

    let client = ScoringClient::from_config(&cfg.scoring);
    let reachable = client.is_reachable();
    let detail = if reachable {
        format!("reachable at {}", cfg.scoring.endpoint)
    } else {
        format!("not reachable at {} — is it running?", cfg.scoring.endpoint)
    };
    print_health_item("Scoring service", reachable, &detail);
    print_health_item(
        "Request timeout",
        true,
        &if cfg.scoring.timeout_ms == 0 {
            "none".to_string()
        } else {
            format!("{}ms", cfg.scoring.timeout_ms)
        },
    );

    let log_exists = logger::assessment_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Assessment log",
        log_exists || !cfg.logging.enabled,
        &if !cfg.logging.enabled {
            "disabled".to_string()
        } else if log_exists {
            format!("{} entries", logger::read_all_entries().len())
        } else {
            "no log file yet".to_string()
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// claridian stats
// ---------------------------------------------------------------------------

pub fn run_stats(format: OutputFormat, days: Option<u32>) -> Result<()> {
    let stats = reporter::compute_stats(days);

    if stats.total_attempts == 0 {
        println!(
            "{}",
            "No data yet. Run an assessment to start the log.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_stats_json(&stats)?,
        OutputFormat::Csv => print_stats_csv(&stats),
        OutputFormat::Table => print_stats_table(&stats),
    }

    Ok(())
}

fn print_stats_table(stats: &Stats) {
    println!("{}", "CLARIDIAN Assessment Log".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();

    let o = &stats.outcomes;
    println!("  {} {}", "Attempts:   ".bold(), stats.total_attempts);
    println!(
        "  {} {} ({:.0}%)",
        "Succeeded:  ".bold(),
        o.success,
        o.pct(o.success)
    );
    if let Some(avg) = stats.avg_latency_ms {
        println!("  {} {:.0}ms", "Avg latency:".bold(), avg);
    }
    println!();

    println!("{}", "Outcomes".bold().cyan());
    println!(
        "  Server errors: {}  Connection failures: {}  Unreadable: {}  Rejected (busy): {}",
        o.server_error, o.transport_error, o.malformed_response, o.busy
    );
    println!();

    if !stats.tiers.is_empty() {
        println!("{}", "Reported Tiers".bold().cyan());
        for (tier, count) in &stats.tiers {
            println!("  {:<12} {:>6}", tier, count);
        }
        println!();
    }

    println!("{}", "By Input Source".bold().cyan());
    for (i, s) in stats.by_source.iter().enumerate() {
        let line = format!("  {:<10} {:>6} attempts {:>6} succeeded", s.source, s.attempts, s.successes);
        if i % 2 == 0 {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_stats_json(stats: &Stats) -> Result<()> {
    let o = &stats.outcomes;
    let value = serde_json::json!({
        "total_attempts": stats.total_attempts,
        "outcomes": {
            "success": o.success,
            "server_error": o.server_error,
            "transport_error": o.transport_error,
            "malformed_response": o.malformed_response,
            "busy": o.busy,
        },
        "tiers": stats.tiers,
        "avg_latency_ms": stats.avg_latency_ms,
        "sources": stats.by_source.iter().map(|s| serde_json::json!({
            "source": s.source,
            "attempts": s.attempts,
            "successes": s.successes,
        })).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_stats_csv(stats: &Stats) {
    println!("source,attempts,successes");
    for s in &stats.by_source {
        println!("{},{},{}", s.source, s.attempts, s.successes);
    }
}

// ---------------------------------------------------------------------------
// claridian trends
// ---------------------------------------------------------------------------

pub fn run_trends(days: u32, format: OutputFormat) -> Result<()> {
    let trends = reporter::compute_trends(days);

    if trends.is_empty() {
        println!("{}", format!("No data in the last {} days.", days).yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_trends_json(&trends)?,
        OutputFormat::Csv => print_trends_csv(&trends),
        OutputFormat::Table => print_trends_table(&trends, days),
    }

    Ok(())
}

fn print_trends_table(trends: &[TrendEntry], days: u32) {
    println!(
        "{}",
        format!("CLARIDIAN Trends — Last {} Days", days).bold().cyan()
    );
    println!("{}", "=".repeat(50));
    println!(
        "  {:<12} {:>8} {:>10} {:>12}",
        "Date", "Attempts", "Succeeded", "Avg latency"
    );
    println!("  {}", "-".repeat(48));

    for entry in trends {
        println!(
            "  {:<12} {:>8} {:>10} {:>12}",
            entry.date,
            entry.attempts,
            entry.successes,
            format_latency(entry.avg_latency_ms),
        );
    }
}

fn print_trends_json(trends: &[TrendEntry]) -> Result<()> {
    let values: Vec<_> = trends
        .iter()
        .map(|t| {
            serde_json::json!({
                "date": t.date,
                "attempts": t.attempts,
                "successes": t.successes,
                "avg_latency_ms": t.avg_latency_ms,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn print_trends_csv(trends: &[TrendEntry]) {
    println!("date,attempts,successes,avg_latency_ms");
    for t in trends {
        println!(
            "{},{},{},{}",
            t.date,
            t.attempts,
            t.successes,
            t.avg_latency_ms.map(|v| format!("{v:.1}")).unwrap_or_default(),
        );
    }
}

// ---------------------------------------------------------------------------
// claridian config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective CLARIDIAN Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.claridian/config.toml", global_exists);
    print_source(".claridian.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "CLARIDIAN_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn format_latency(ms: Option<f64>) -> String {
    match ms {
        Some(v) => format!("{v:.0}ms"),
        None => "—".to_string(),
    }
}

/// Terminal color for a classifier color role.
fn colorize_role(text: &str, role: &str) -> ColoredString {
    match role {
        "risk-high" => text.red().bold(),
        "risk-moderate" => text.yellow().bold(),
        "risk-low" => text.green().bold(),
        _ => text.normal(),
    }
}

fn colorize_category(text: &str, category: ItemCategory) -> ColoredString {
    match category {
        ItemCategory::High => text.red(),
        ItemCategory::Moderate => text.yellow(),
        ItemCategory::Low => text.green(),
        ItemCategory::Default => text.normal(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
