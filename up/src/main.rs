use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use unprefix::cli::{Cli, Command};
use unprefix::{Config, Pipeline, WriteMode};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > WARN
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        },
        None => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("{}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(prefix) = cli.prefix {
        config.prefix = prefix;
    }
    config.validate();

    info!(root = %config.root.display(), prefix = %config.prefix, "unprefix starting");

    let pipeline = Pipeline::from_config(&config).context("Failed to collect files")?;

    match cli.command.unwrap_or_default() {
        Command::Run { dry_run } => cmd_run(&pipeline, dry_run),
        Command::Files => {
            for path in pipeline.files.paths() {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Catalog { ordered } => {
            if ordered {
                for name in pipeline.rewriter.order() {
                    println!("{}", name);
                }
            } else {
                for name in pipeline.catalog.names() {
                    println!("{}", name);
                }
            }
            Ok(())
        }
        Command::Check => cmd_check(&pipeline),
    }
}

/// Rewrite every selected file, echoing each path as it is processed
fn cmd_run(pipeline: &Pipeline, dry_run: bool) -> Result<()> {
    let mode = if dry_run { WriteMode::DryRun } else { WriteMode::Apply };

    pipeline
        .rewriter
        .rewrite_all(&pipeline.files, mode, |file| println!("{}", file.relative.display()))
        .context("Failed to rewrite files")?;
    Ok(())
}

fn cmd_check(pipeline: &Pipeline) -> Result<()> {
    let mut dirty = 0usize;

    for file in &pipeline.files {
        let content = std::fs::read_to_string(&file.path)
            .context(format!("Failed to read {}", file.relative.display()))?;
        let remaining = pipeline.rewriter.remaining(&content);
        if remaining > 0 {
            dirty += 1;
            println!("{} {} ({})", "✗".red(), file.relative.display(), remaining);
        }
    }

    if dirty > 0 {
        return Err(eyre::eyre!("{} files still contain prefixed names", dirty));
    }

    println!("{} No prefixed names in {} files", "✓".green(), pipeline.files.len());
    Ok(())
}
