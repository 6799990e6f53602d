//! Media Archivist - organize photos and videos by capture date
//!
//! Reads capture dates from embedded metadata and moves files into a
//! TARGET/YYYY/YYYY-MM-DD layout, with duplicate and conflict handling.

use anyhow::Result;
use clap::Parser;
use media_archivist::media::Outcome;
use media_archivist::{Cli, Config, Pipeline, RunReport};
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Media Archivist starting");

    let config = load_config(&cli)?;
    config.validate()?;

    let dry_run = config.dry_run;
    let verbose = config.verbose;
    let mut pipeline = Pipeline::new(config);

    let items = match pipeline.run() {
        Ok(items) => items,
        Err(e) => {
            error!(error = %e, "Run aborted");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let report = RunReport::from_items(&items);

    if verbose {
        for item in &items {
            match item.outcome {
                Outcome::Moved => {
                    if let Some(target) = &item.target {
                        println!("  {} -> {}", item.source.display(), target.display());
                    }
                }
                Outcome::Duplicate => println!(
                    "  {} ({})",
                    item.source.display(),
                    item.note.as_deref().unwrap_or("duplicate")
                ),
                _ => {}
            }
        }
    }

    println!("{}", report.summary());

    if report.duplicates > 0 && !dry_run {
        println!(
            "Removed {} redundant duplicate(s) from source",
            report.duplicates
        );
    }

    if !report.errors.is_empty() {
        eprintln!("There were {} errors:", report.errors.len());
        for (path, message) in &report.errors {
            eprintln!("- {}: {}", path.display(), message);
        }
    }

    if dry_run {
        println!("Dry run - no files were modified");
    }

    std::process::exit(report.exit_code());
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    Ok(config)
}

/// Setup logging: stderr always, plus an optional non-blocking file layer
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if let Some(ref log_path) = cli.log_file {
        if let Some(parent) = log_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file);

        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();

        Ok(Some(guard))
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        Ok(None)
    }
}
