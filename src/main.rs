//! Pipeline binary entry point.
//!
//! With no arguments the full pipeline runs once: extract, partition,
//! aggregate. Stage subcommands run a single layer. The exit code reflects
//! the run outcome so schedulers can distinguish success from failure
//! without parsing log text.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::Parser as _;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = brewlake::logging::init() {
        eprintln!("Failed to initialize logging: {err:#}");
        return ExitCode::FAILURE;
    }

    let cli = cli::Cli::parse();
    match cli::run_command(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
