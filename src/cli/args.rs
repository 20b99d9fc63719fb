//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// imgcache - Lazy image variant cache
///
/// Serves resized image variants on demand, computing and persisting
/// them lazily, with a durable origin to re-fetch from when nothing is
/// cached.
#[derive(Parser, Debug)]
#[command(name = "imgcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "IMGCACHE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP cache server
    Serve(ServeArgs),

    /// Resolve one image through the cache cascade
    Fetch(FetchArgs),

    /// Invalidate cached data for one image
    Flush(FlushArgs),

    /// List the output profile catalog
    Profiles(ProfilesArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Bind address override (defaults to [server] bind from config)
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Output profile to render, e.g. thumbnail
    pub profile: String,

    /// Logical image name, e.g. products/0384001.jpg
    pub reference: String,

    /// Write the bytes here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the flush command
#[derive(Parser, Debug)]
pub struct FlushArgs {
    /// Tier to flush: a profile name, or "original" to drop the raw
    /// copy and every variant with it
    pub profile: String,

    /// Logical image name
    pub reference: String,
}

/// Arguments for the profiles command
#[derive(Parser, Debug)]
pub struct ProfilesArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Output format for listing commands
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}
