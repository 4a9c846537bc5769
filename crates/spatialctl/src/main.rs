#![warn(missing_docs)]

//! Entry point for the `spatialctl` binary.

mod arrange;
mod backend;
mod cli;
mod decode;
mod encode;
mod error;
mod feasibility;
mod occlusion;
mod report;

use std::{io, process};

use clap::Parser;
use spatial::SpatialConfig;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{
    cli::{Cli, Commands},
    error::Result,
    report::Context,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, load config, and dispatch.
fn run() -> Result<()> {
    let Cli {
        log,
        config,
        json,
        command,
    } = Cli::parse();
    let env_filter = log.filter();
    registry()
        .with(env_filter)
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .try_init()
        .ok();

    let config = match config {
        Some(path) => SpatialConfig::load(&path)?,
        None => SpatialConfig::default(),
    };
    let ctx = Context { config, json };

    match command {
        Commands::Encode(args) => encode::run(&args, &ctx),
        Commands::Decode(args) => decode::run(&args, &ctx),
        Commands::Occlusion(args) => occlusion::run(&args, &ctx),
        Commands::Arrange(args) => arrange::run(&args, &ctx),
        Commands::Feasibility(args) => feasibility::run(&args, &ctx),
    }
}
