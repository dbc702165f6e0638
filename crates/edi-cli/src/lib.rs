//! Library side of the `edi` command-line tool: argument definitions,
//! subcommand runners, logging setup and `edi.toml` configuration.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
