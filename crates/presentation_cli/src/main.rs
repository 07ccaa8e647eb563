//! busroute
//!
//! Command-line front end of the school transport route planner: configure
//! the start and end points, manage the student roster, and compute the
//! pickup itinerary.

#![allow(clippy::print_stdout)]

mod cli;
mod commands;
mod render;

use clap::Parser;
use infrastructure::{AppConfig, Services, init_tracing};

use crate::cli::{Cli, log_filter_from_verbosity};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref())?;

    // -v flags override the configured level
    let level = (cli.verbose > 0).then(|| log_filter_from_verbosity(cli.verbose));
    init_tracing(&config.logging, level)?;

    let services = Services::from_config(&config).await?;
    commands::run(cli.command, &services).await
}
