mod app;
mod cli;
mod protocol;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use tokio::io::BufReader;

use trajscope_server::{AdapterConfig, HttpAdapter};

use crate::app::RunOptions;
use crate::cli::CliArgs;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    if let Err(e) = start(&args) {
        error!("trajscope: {:#}", e);
        process::exit(1);
    }
}

fn start(args: &CliArgs) -> Result<()> {
    let config = args.load_config()?;
    info!(
        "trajscope: sampling {} trips from {}",
        config.sample_size, config.endpoints.trips
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;

    let adapter = HttpAdapter::new(AdapterConfig::from(&config))?;
    let options = RunOptions {
        emit_frames: args.emit_frames,
    };

    runtime.block_on(app::run(
        &config,
        &options,
        Arc::new(adapter),
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    ))
}
