//! CLI handling
//!
//! Turns parsed arguments into a run configuration, drives the batch and
//! prints the report.

use std::path::PathBuf;

use clap::Parser;

use crate::checks::{report, Catalog, Orchestrator, ProcessRunner};
use crate::common::config::{DEFAULT_ICMP_SIZE, DEFAULT_RETRIES, DEFAULT_SCRIPT};
use crate::common::{CheckerConfig, Error, Result};

/// Command line of the `fragcheck` binary
#[derive(Parser, Debug)]
#[command(name = "fragcheck", version)]
#[command(about = "Run all fragattack checks in batch")]
#[command(long_about = "Wrapper for fragattack.py that executes all checks in batch.\n\
Remember to run it from the appropriate environment, i.e. as root with the venv activated.")]
pub struct Cli {
    /// Interface to use for checks
    #[arg(required_unless_present = "list")]
    pub interface: Option<String>,

    /// fragattack script
    #[arg(long, short, default_value = DEFAULT_SCRIPT)]
    pub script: PathBuf,

    /// Verbosity (-v for progress, -vv for raw script output)
    #[arg(long, short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Skip the mixed key attacks, which might hang during execution
    #[arg(long, short = 'n')]
    pub no_mixed_keys: bool,

    /// Also run the attacks whose result must be checked manually in a capture
    #[arg(long, short = 'm')]
    pub manual: bool,

    /// Number of retries if the script suggests a retry for assurance
    #[arg(long, short, default_value_t = DEFAULT_RETRIES)]
    pub retries: u32,

    /// ICMP payload size used when the setup needs smaller pings
    #[arg(long, default_value_t = DEFAULT_ICMP_SIZE)]
    pub icmp_size: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// List the test cases and exit
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    /// Build the run configuration; requires an interface
    pub fn config(&self) -> Result<CheckerConfig> {
        let interface = self
            .interface
            .clone()
            .ok_or_else(|| Error::Config("an interface is required".to_string()))?;

        let mut config = CheckerConfig::new(interface);
        config.script = self.script.clone();
        config.max_retries = self.retries;
        config.manual_analysis = self.manual;
        config.mixed_key = !self.no_mixed_keys;
        config.icmp_size = self.icmp_size;
        config.validate()
    }
}

/// Run the CLI
pub async fn dispatch(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let catalog = Catalog::builtin();

    if cli.list {
        print!("{}", catalog.listing());
        return Ok(());
    }

    let config = cli.config()?;
    tracing::debug!(?config, "starting batch");

    let results = Orchestrator::new(&ProcessRunner, &catalog, &config)
        .run()
        .await?;

    if cli.json {
        println!("{}", report::render_json(&results)?);
    } else {
        print!("{}", report::render(&results));
    }

    Ok(())
}
