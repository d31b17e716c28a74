//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Cookbook tutorial authoring toolkit
#[derive(Parser, Debug, Clone)]
#[command(name = "cookbook", version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file name, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "cookbook.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Preview a tutorial README with live reload
    #[command(visible_alias = "p")]
    Preview {
        #[command(flatten)]
        args: PreviewArgs,
    },

    /// Create a new tutorial from templates
    #[command(visible_alias = "c")]
    Create {
        #[command(flatten)]
        args: CreateArgs,
    },

    /// Query chain information from a node over JSON-RPC
    Probe {
        #[command(flatten)]
        args: ProbeArgs,
    },
}

/// Preview command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct PreviewArgs {
    /// Tutorial directory to preview (default: current directory)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<std::net::IpAddr>,

    /// Port number to listen on (overrides the PORT environment variable)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Do not open a browser after the server starts
    #[arg(long)]
    pub no_open: bool,
}

/// Create command arguments.
#[derive(clap::Args, Debug, Clone)]
#[command(after_help = "Examples:\n  cookbook create zero-to-hero\n  cookbook create add-nft-pallet\n  cookbook create custom-runtime")]
pub struct CreateArgs {
    /// Tutorial slug: lowercase words separated by single dashes (e.g. "my-tutorial")
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Skip package manager invocations (package.json is still written)
    #[arg(long)]
    pub skip_install: bool,

    /// Do not create a `feat/tutorial-<slug>` git branch
    #[arg(long)]
    pub no_git: bool,
}

/// Probe command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ProbeArgs {
    /// WebSocket RPC endpoint (overrides POLKADOT_WS)
    #[arg(short, long, value_hint = clap::ValueHint::Url)]
    pub endpoint: Option<String>,

    /// Spawn the configured node binary before probing
    #[arg(short, long)]
    pub spawn: bool,

    /// Seconds to wait for the RPC port to accept connections
    #[arg(short, long)]
    pub timeout: Option<u64>,
}
