use anyhow::Result;
use clap::{Parser, Subcommand};

use claridian::cli::{self, AssessArgs, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "claridian")]
#[command(about = "Risk assessment dashboard: scoring client, care-plan timeline and reports")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score a set of metrics (or a clinician note) and show the dashboard
    Assess(AssessArgs),
    /// Classify a risk score into its tier
    Classify {
        /// Score to classify (0-100)
        #[arg(allow_hyphen_values = true)]
        score: f64,
    },
    /// Show the daily care-plan timeline for a tier
    Timeline {
        /// Tier: low, moderate, high (omit for the empty plan)
        #[arg(long)]
        tier: Option<String>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Start the web dashboard
    Serve {
        /// Bind address (default from config: 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_browser: bool,
    },
    /// Check config, scoring endpoint and log file
    Health,
    /// Summarize the assessment log
    Stats {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
    },
    /// Daily assessment counts over the last N days
    Trends {
        /// Number of days to analyze (default: 7)
        #[arg(long, default_value = "7")]
        days: u32,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default config to ~/.claridian/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `scoring.endpoint`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Assess(args) => cli::run_assess(&args),
        Commands::Classify { score } => cli::run_classify(score),
        Commands::Timeline { tier, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_timeline(tier.as_deref(), fmt)
        }
        Commands::Serve { addr, no_browser } => cli::run_serve(addr.as_deref(), no_browser),
        Commands::Health => cli::run_health(),
        Commands::Stats { format, days } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt, days)
        }
        Commands::Trends { days, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_trends(days, fmt)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
