// src/bin/timekeep.rs

use clap::Parser;
use colored::*;
use timekeep::cli::{Cli, dispatcher};

/// The main entry point of the `timekeep` application.
/// It sets up logging, parses arguments, dispatches to the handler and performs
/// centralized error handling.
fn main() {
    env_logger::init();

    let cli = Cli::parse();
    log::debug!("CLI args parsed: {:?}", cli);

    if let Err(e) = dispatcher::dispatch(cli) {
        // `{:#}` prints the whole context chain on one line.
        eprintln!("\n{}: {:#}", timekeep::t!("error.label").red().bold(), e);
        std::process::exit(1);
    }
}
