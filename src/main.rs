//! Helfetch - system information fetcher for Helwan Linux
//!
//! Collects host, hardware, desktop, and network facts concurrently and
//! prints them as an aligned, colorized table together with performance
//! recommendations, the distribution logo, and a random quote.
//!
//! Exit codes:
//!   0 - Report printed
//!   1 - Fatal error (the worker runtime could not be started)

mod analysis;
mod cli;
mod collector;
mod config;
mod display;
mod error;
mod models;
mod quotes;

use anyhow::Result;
use cli::Args;
use config::Config;
use display::{format_report, ColorScheme, RenderSpec};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> ExitCode {
    init_logging();

    let args = Args::parse_args();
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging. `RUST_LOG` overrides the default `warn` level; all
/// output goes to stderr so stdout carries only the report.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Collect, analyse, and render. Returns the finished report text.
fn run(args: Args) -> Result<String> {
    let mut config = load_config();
    config.merge_with_args(&args);

    let tasks = collector::default_tasks(&config);
    // One unit per collector plus the quote selector.
    let units = tasks.len() + 1;
    let runtime = collector::build_runtime(units)?;
    info!("Running {} collection units", units);

    let gathered = runtime.block_on(collector::gather(tasks, quotes::random_quote));
    if gathered.record.is_empty() {
        warn!("Every collector failed; the report has no facts");
    } else {
        debug!("Collected {} fields", gathered.record.len());
    }

    let recommendations = config
        .display
        .recommendations
        .then(|| analysis::recommend(&gathered.record));
    let logo = if config.display.logo {
        display::logo::for_distro(display::logo::DEFAULT_DISTRO)
    } else {
        None
    };
    let quote = gathered.quote.as_deref().filter(|_| config.display.quote);

    let spec = RenderSpec {
        logo: logo.as_deref(),
        quote,
        recommendations: recommendations.as_deref(),
        scheme: ColorScheme::from(&config.colors),
        usage_bars: config.usage_bars(),
        ..RenderSpec::new(&gathered.record)
    };

    Ok(format_report(&spec))
}

/// Load configuration from the default location, falling back to defaults.
fn load_config() -> Config {
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded config from {:?}", Config::default_path());
            config
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Config::default()
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Config::default()
        }
    }
}
