//! CLI module for tokenrelay
//!
//! Provides command-line interface for:
//! - serve: boot the relay server
//! - check-config: validate and print the resolved configuration

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check_config, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
