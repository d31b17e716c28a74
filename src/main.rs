//! cookbook: live preview, scaffolding and node probes for tutorial authors.

mod actor;
mod cli;
mod config;
mod core;
mod embed;
mod hub;
mod logger;
mod markdown;
mod node;
mod page;
mod utils;

use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() {
    if let Err(e) = run() {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "loaded {}", path.display());
    }

    match &cli.command {
        Commands::Preview { args } => cli::preview::run_preview(args, &config),
        Commands::Create { args } => cli::create::run_create(args, &config),
        Commands::Probe { args } => cli::probe::run_probe(args, &config),
    }
}
