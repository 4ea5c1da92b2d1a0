//! # quire
//!
//! Command-line entry point. Loads settings once, resolves the active class
//! workspace, and runs one subcommand against it. The binary never talks to
//! a model; conversational turns are driven by the embedding application
//! through `quire-runtime`.

#![deny(unsafe_code)]

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => quire_settings::load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => quire_settings::load_settings().context("Failed to load settings")?,
    };
    let settings = cli.apply_overrides(settings);
    quire_core::logging::init_subscriber(&settings.logging.level);

    let output = commands::run(&cli.command, &settings).await?;
    println!("{}", output.text);
    Ok(if output.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
