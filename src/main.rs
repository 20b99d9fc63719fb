//! imgcache - Lazy image variant cache
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use imgcache::cli::{Cli, Commands};
use imgcache::config::ConfigManager;
use imgcache::error::ImgcacheResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ImgcacheResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    init_tracing(cli.verbose, &config.general.log_format);

    // Dispatch to command
    match cli.command {
        Commands::Serve(args) => imgcache::cli::commands::serve(args, &config).await,
        Commands::Fetch(args) => imgcache::cli::commands::fetch(args, &config).await,
        Commands::Flush(args) => imgcache::cli::commands::flush(args, &config).await,
        Commands::Profiles(args) => imgcache::cli::commands::profiles(args).await,
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug. Logs go to stderr
/// so `fetch` can stream image bytes on stdout.
fn init_tracing(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("imgcache=warn"),
        1 => EnvFilter::new("imgcache=info"),
        _ => EnvFilter::new("imgcache=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
