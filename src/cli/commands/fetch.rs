//! Fetch command - resolve one image through the cache cascade

use crate::cli::args::FetchArgs;
use crate::cli::commands::build_app_state;
use crate::config::Config;
use crate::error::{ImgcacheError, ImgcacheResult};
use console::style;
use std::io::Write;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> ImgcacheResult<()> {
    let state = build_app_state(config)?;
    state.validator.check_profile_for_fetch(&args.profile)?;
    state.validator.check_image_name(&args.reference)?;

    let bytes = state.service.resolve(&args.reference, &args.profile).await?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| ImgcacheError::io(format!("writing {}", path.display()), e))?;
            eprintln!(
                "{} {} ({} bytes)",
                style("Wrote").green().bold(),
                path.display(),
                bytes.len()
            );
        }
        None => {
            // raw bytes on stdout so the command pipes cleanly
            std::io::stdout()
                .write_all(&bytes)
                .map_err(|e| ImgcacheError::io("writing image to stdout", e))?;
        }
    }

    Ok(())
}
