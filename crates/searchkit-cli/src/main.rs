//! SearchKit CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use searchkit_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use searchkit_cli::commands::{decode_url, run_search};
use searchkit_cli::logging::{LogConfig, LogFormat, init_logging};
use searchkit_cli::summary::{print_summary, render_trace};
use searchkit_core::SearchKitConfig;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = SearchKitConfig::load_or_default(cli.config.as_deref())?;
    match &cli.command {
        Command::Run(args) => {
            let outcome = run_search(args, &config)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome.report())?);
            } else {
                print_summary(&outcome);
                if args.trace {
                    println!();
                    println!("Actions:");
                    println!("{}", render_trace(&outcome.trace));
                }
            }
            Ok(if outcome.has_error() { 1 } else { 0 })
        }
        Command::Url(args) => {
            let state = decode_url(args, &config)?;
            println!("{}", serde_json::to_string_pretty(&state)?);
            Ok(0)
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
