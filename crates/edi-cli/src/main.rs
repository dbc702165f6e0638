//! `edi` command-line tool.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use edi_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use edi_cli::commands::{run_parse, run_rules, run_show, run_status, run_submit, run_validate};
use edi_cli::config::load_config;
use edi_cli::logging::{LogConfig, LogFormat, init_logging};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

mod summary;

use crate::summary::{
    print_findings, print_parse_summary, print_rules, print_submission, print_transaction_status,
};

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
    let config = load_config(cli.config.as_deref())?;
    match &cli.command {
        Command::Parse(args) => {
            let outcome = run_parse(args, &config)?;
            if args.json {
                print_json(&outcome.document)?;
            } else {
                print_parse_summary(&args.file, &outcome);
            }
            Ok(0)
        }
        Command::Validate(args) => {
            let findings = run_validate(args, &config)?;
            if args.json {
                print_json(&findings)?;
            } else {
                print_findings(&findings);
            }
            Ok(i32::from(!findings.is_empty()))
        }
        Command::Submit(args) => {
            let outcome = run_submit(args, &config)?;
            if args.json {
                print_json(&outcome)?;
            } else {
                print_submission(&outcome);
            }
            Ok(i32::from(!outcome.ok))
        }
        Command::Status(args) => {
            let transaction = run_status(args, &config)?;
            print_transaction_status(&transaction);
            Ok(0)
        }
        Command::Show(args) => {
            let transaction = run_show(args, &config)?;
            print_json(&transaction)?;
            Ok(0)
        }
        Command::Rules(args) => {
            let rules = run_rules(args, &config)?;
            print_rules(&rules);
            Ok(0)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
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
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
