//! CLI command implementations

mod convert;
mod inspect;

use crate::cli::LogLevel;
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    match cli.command {
        Command::Convert(args) => convert::run_convert(args, log_level),
        Command::Inspect(args) => inspect::run_inspect(args, log_level),
    }
}
