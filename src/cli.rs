//! Command-line interface for rootclock.
//!
//! This module handles CLI argument parsing and the `--print-config` action.

use anyhow::{Context, Result};
use clap::Parser;
use rootclock_config::{Config, LogLevel};
use std::path::{Path, PathBuf};

/// rootclock - a time/date block drawn on every monitor's desktop background
#[derive(Parser, Debug)]
#[command(name = "rootclock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/rootclock/config.yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace. Overrides RUST_LOG and the config file
    #[arg(long, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    pub print_config: bool,
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    /// Config file to load instead of the default path
    pub config_path: Option<PathBuf>,
    /// Log level from the command line
    pub log_level: Option<LogLevel>,
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with normal startup
    Continue(RuntimeOptions),
    /// Exit with the given code (the requested action completed)
    Exit(i32),
}

fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::from_name(s).ok_or_else(|| {
        format!("unknown log level '{s}' (expected off, error, warn, info, debug or trace)")
    })
}

/// Process CLI arguments
pub fn process_cli() -> CliResult {
    handle(Cli::parse())
}

fn handle(cli: Cli) -> CliResult {
    if cli.print_config {
        return match print_config(cli.config.as_deref()) {
            Ok(()) => CliResult::Exit(0),
            Err(e) => {
                eprintln!("rootclock: {e:#}");
                CliResult::Exit(1)
            }
        };
    }

    CliResult::Continue(RuntimeOptions {
        config_path: cli.config,
        log_level: cli.log_level,
    })
}

/// Load the config from `path`, or the default location.
///
/// A missing file yields the built-in defaults. The result is validated.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(Config::config_path);
    Config::load_from(&path).with_context(|| format!("failed to load config {}", path.display()))
}

fn print_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
