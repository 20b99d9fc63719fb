//! Flush command - invalidate cached data for one image

use crate::cli::args::FlushArgs;
use crate::cli::commands::build_app_state;
use crate::config::Config;
use crate::error::ImgcacheResult;
use crate::profile::ORIGINAL_TIER;
use console::style;

/// Execute the flush command
pub async fn execute(args: FlushArgs, config: &Config) -> ImgcacheResult<()> {
    let state = build_app_state(config)?;
    state.validator.check_profile_for_delete(&args.profile)?;
    state.validator.check_image_name(&args.reference)?;

    state
        .service
        .invalidate(&args.reference, &args.profile)
        .await?;

    if args.profile == ORIGINAL_TIER {
        eprintln!(
            "{} original and all variants of {}",
            style("Flushed").green().bold(),
            args.reference
        );
    } else {
        eprintln!(
            "{} {} variant of {}",
            style("Flushed").green().bold(),
            args.profile,
            args.reference
        );
    }

    Ok(())
}
