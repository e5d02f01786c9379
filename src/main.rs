mod app;
mod cli;
mod config;
mod controller;
mod domain;
mod fallback;
mod infrastructure;
mod predict;
mod storage;
#[cfg(test)]
mod testing;
mod ui;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use infrastructure::{directories, logging};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths, logging::ConsoleOutput::detect(cli.quiet_console()))?;

    let app = app::PhishGuardApp::initialize(config, paths)?;
    app.run(cli.command).await
}
