use analytics::{AnalyticsAggregator, RefreshOutcome};
use anyhow::Context;
use api_client::HttpClient;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use configuration::{ConfigOverrides, init_tracing, load_config, load_session};
use core_types::{DateRange, Section};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod render;

/// The main entry point for the ticketdesk organizer tools.
#[tokio::main]
async fn main() {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Analytics(ref args) => handle_analytics(&cli, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Organizer dashboard for the event-ticketing platform.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show overview, events and revenue analytics for an organizer.
    Analytics(AnalyticsArgs),
}

#[derive(Parser)]
struct AnalyticsArgs {
    /// First day of the range (format: YYYY-MM-DD). Defaults to January 1st of this year.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the range (format: YYYY-MM-DD). Defaults to December 31st of this year.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Organizer to report on. Defaults to the signed-in user.
    #[arg(long)]
    organizer: Option<String>,

    /// Only print one section.
    #[arg(long, value_enum)]
    section: Option<SectionArg>,

    /// Print the raw view model as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SectionArg {
    Overview,
    Events,
    Revenue,
}

impl From<SectionArg> for Section {
    fn from(arg: SectionArg) -> Self {
        match arg {
            SectionArg::Overview => Section::Overview,
            SectionArg::Events => Section::Events,
            SectionArg::Revenue => Section::Revenue,
        }
    }
}

// ==============================================================================
// Analytics Command Logic
// ==============================================================================

/// Builds the date range from the optional bounds, starting from the current year.
fn resolve_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> anyhow::Result<DateRange> {
    let range = match (from, to) {
        (Some(from), Some(to)) => DateRange::new(from, to)?,
        (Some(from), None) => DateRange::current_year().with_start(from)?,
        (None, Some(to)) => DateRange::current_year().with_end(to)?,
        (None, None) => DateRange::current_year(),
    };
    Ok(range)
}

/// Handles the orchestration of one dashboard load.
async fn handle_analytics(cli: &Cli, args: &AnalyticsArgs) -> anyhow::Result<()> {
    let mut config = load_config(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    config.apply(&cli.overrides);
    configuration::validate(&config)?;

    let _log_guard = init_tracing(&config.logging)?;

    let session = load_session(&config.session.path)?;
    let range = resolve_range(args.from, args.to)?;
    let client = Arc::new(HttpClient::new(&config.api)?);
    let aggregator = AnalyticsAggregator::new(client, session);

    tracing::info!(base_url = %config.api.base_url, range = %range, "Loading organizer analytics.");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Loading analytics for {}...", range));

    let result = match &args.organizer {
        Some(organizer_id) => aggregator.refresh(organizer_id, range).await,
        None => aggregator.on_date_range_changed(range).await,
    };
    spinner.finish_and_clear();

    let outcome: RefreshOutcome = match result {
        Ok(outcome) => outcome,
        Err(e) => anyhow::bail!("{}\nRun the same command again to retry.", e),
    };
    tracing::debug!(?outcome, "Analytics refresh finished.");

    let state = aggregator.snapshot().await;
    let model = state
        .visible_model()
        .context("analytics finished without a model to show")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(model)?);
        return Ok(());
    }

    render::print_header(&range);
    let sections: Vec<Section> = match args.section {
        Some(section) => vec![section.into()],
        None => Section::ALL.to_vec(),
    };
    for section in sections {
        render::print_section(model, section);
    }

    Ok(())
}
