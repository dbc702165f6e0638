//! CLI argument definitions for the `edi` tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use edi_model::TransactionType;

#[derive(Parser)]
#[command(
    name = "edi",
    version,
    about = "X12 EDI ingestion - parse, validate and submit healthcare transactions",
    long_about = "Parse X12 interchanges into their envelope structure, validate them \
                  against configurable rules, and track submitted transactions through \
                  their status lifecycle."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Configuration file (default: ./edi.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow EDI payload content in logs. Payloads carry PHI; off by default.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a file and print its envelope structure.
    Parse(ParseArgs),

    /// Validate a file against the configured rules.
    Validate(ValidateArgs),

    /// Submit a file: validate it and record a transaction.
    Submit(SubmitArgs),

    /// Record an explicit status for a submitted transaction.
    Status(StatusArgs),

    /// Print a stored transaction as JSON.
    Show(ShowArgs),

    /// List the active validation rules.
    Rules(RulesArgs),
}

#[derive(Args)]
pub struct ParseArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the parsed document as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Rules file (CSV or JSON); overrides the configuration.
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Print findings as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct SubmitArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Transaction type, e.g. 837P, 835, 270.
    #[arg(long = "type", value_name = "TYPE")]
    pub transaction_type: TransactionType,

    #[arg(long = "provider", value_name = "ID")]
    pub provider: Option<String>,

    #[arg(long = "claim", value_name = "ID")]
    pub claim: Option<String>,

    #[arg(long = "patient", value_name = "ID")]
    pub patient: Option<String>,

    /// Rules file (CSV or JSON); overrides the configuration.
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Print the submission outcome as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct StatusArgs {
    #[arg(value_name = "ID")]
    pub transaction_id: String,

    /// ACCEPTED, REJECTED or ERROR.
    #[arg(value_name = "STATUS")]
    pub status: String,

    #[arg(long = "error-code")]
    pub error_code: Option<String>,

    #[arg(long = "error-message")]
    pub error_message: Option<String>,

    /// Identifier of the response transaction.
    #[arg(long = "response-id")]
    pub response_id: Option<String>,

    /// File holding the raw response payload.
    #[arg(long = "response-file", value_name = "PATH")]
    pub response_file: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(value_name = "ID")]
    pub transaction_id: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct RulesArgs {
    /// Rules file (CSV or JSON); overrides the configuration.
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Include inactive rules.
    #[arg(long = "all")]
    pub all: bool,
}

#[derive(Args)]
pub struct StoreArgs {
    /// Transaction store directory; overrides the configuration.
    #[arg(long = "store-dir", value_name = "DIR")]
    pub store_dir: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
