#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use salience::Config;
use salience::cli::{Cli, dispatch};
use salience::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    // Initialize logging
    init_tracing(&config.observability.log_level)?;

    dispatch(cli, config).await
}
