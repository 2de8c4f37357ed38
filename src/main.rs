//! Fragattack checker - runs every fragattack check in batch
//!
//! Invokes the fragattack script once per test case, retries results the
//! script marks as uncertain and prints a categorized pass/fail table.

use clap::Parser;
use fragcheck::cli::{self, Cli};
use fragcheck::common::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose, cli.no_color);

    if let Err(e) = cli::dispatch(cli).await {
        eprintln!("Error: {e}");
        if e.is_setup_failure() {
            eprintln!("No checks were run.");
        }
        std::process::exit(1);
    }
}
