//! FeedFill - feed auto-fill coordinator
//!
//! Main entry point for the FeedFill CLI.

mod adapters;
mod cli;
mod cmd_feed;
mod cmd_generate;
mod cmd_settings;

use std::path::Path;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use feedfill_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};

/// Initialize tracing with console and optional file output.
///
/// File logs rotate daily under `logging.directory`.
fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let file_layer = match &config.directory {
        Some(directory) => {
            let log_dir = ConfigLoader::expand_path(directory);
            std::fs::create_dir_all(&log_dir)?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("feedfill")
                .filename_suffix("log")
                .max_log_files(config.max_log_files)
                .build(&log_dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // the guard flushes on drop, keep it for the whole process
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // logs go to stderr, command output to stdout
    tracing_subscriber::registry()
        .with(env_filter)
        .with(config.json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!config.json).then(|| {
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr)
        }))
        .with(file_layer)
        .init();

    Ok(())
}

/// Reject invalid configuration, log warnings.
fn check_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let warnings = ConfigValidator::validate(config).into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Validate) {
        return validate(&cli.config);
    }

    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config.logging)?;
    info!("FeedFill v{}", env!("CARGO_PKG_VERSION"));
    check_config(&config)?;

    match cli.command {
        Commands::Run {
            feed,
            duration_secs,
            output,
        } => cmd_feed::run_feed(&config, &feed, duration_secs, output.as_deref()).await,
        Commands::Compose { feed, text } => cmd_feed::compose(&config, &feed, &text).await,
        Commands::Generate {
            text,
            author,
            refinement,
            draft,
        } => cmd_generate::generate(&config, text, author, refinement, draft).await,
        Commands::Settings { action } => cmd_settings::handle_settings_command(&config, action).await,
        Commands::Validate => Ok(()),
    }
}

/// Validate the configuration file and print the findings.
fn validate(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load(path)?;
    let result = ConfigValidator::validate(&config);

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    if result.is_valid() {
        println!("{} is valid", path.display());
        Ok(())
    } else {
        Err(format!("{} has {} error(s)", path.display(), result.errors.len()).into())
    }
}
