//! Profiles command - list the output profile catalog

use crate::cli::args::{OutputFormat, ProfilesArgs};
use crate::error::ImgcacheResult;
use crate::profile::{ImageProfile, ProfileCatalog};

/// Execute the profiles command
pub async fn execute(args: ProfilesArgs) -> ImgcacheResult<()> {
    let catalog = ProfileCatalog::builtin()?;
    let mut profiles: Vec<&ImageProfile> = catalog.profiles().collect();
    profiles.sort_by(|a, b| a.name.cmp(&b.name));

    match args.format {
        OutputFormat::Table => print_table(&profiles),
        OutputFormat::Json => print_json(&profiles)?,
    }

    Ok(())
}

fn print_table(profiles: &[&ImageProfile]) {
    println!(
        "{:<20} {:<12} {:<8} {:<8} {:<8} {:<10}",
        "NAME", "SIZE", "MODE", "QUALITY", "FORMAT", "FILL"
    );
    println!("{}", "-".repeat(70));

    for profile in profiles {
        let fill = profile
            .fill_color
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:<12} {:<8} {:<8} {:<8} {:<10}",
            profile.name,
            format!("{}x{}", profile.width, profile.height),
            profile.scale_mode.as_str(),
            profile.quality,
            profile.format.as_str(),
            fill
        );
    }

    println!();
    println!("Total: {} profile(s)", profiles.len());
}

fn print_json(profiles: &[&ImageProfile]) -> ImgcacheResult<()> {
    #[derive(serde::Serialize)]
    struct ProfileJson {
        name: String,
        width: u32,
        height: u32,
        quality: u8,
        mode: String,
        fill_color: Option<String>,
        format: String,
    }

    let json_profiles: Vec<ProfileJson> = profiles
        .iter()
        .map(|p| ProfileJson {
            name: p.name.clone(),
            width: p.width,
            height: p.height,
            quality: p.quality,
            mode: p.scale_mode.as_str().to_string(),
            fill_color: p.fill_color.map(|c| c.to_string()),
            format: p.format.as_str().to_string(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json_profiles)?);
    Ok(())
}
