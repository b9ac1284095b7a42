//! Binary crate for the `widgets` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Driving the calculator from the terminal
//! - Human-friendly output for weather and dictionary lookups

use std::process;

use clap::Parser;

mod calc;
mod cli;
mod logging;
mod lookup;

#[tokio::main]
async fn main() {
    let cmd = cli::Cli::parse();
    logging::init(cmd.verbose);

    if let Err(e) = cmd.run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
