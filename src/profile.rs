//! Output profile catalog
//!
//! A profile is a named, statically configured output specification:
//! geometry, quality, scale mode, and encoded format. The catalog is the
//! closed set of variants this service will ever produce; it is built once
//! at startup, validated, and shared read-only into the resolver, the
//! transform engine, and the HTTP boundary.

use crate::error::{ImgcacheError, ImgcacheResult};
use std::collections::HashMap;

/// The reserved tier holding unprocessed source bytes. Not a profile:
/// it can be flushed but never requested for display.
pub const ORIGINAL_TIER: &str = "original";

/// An RGB fill color parsed from `#rrggbb` notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Parse a `#rrggbb` hex string
    pub fn from_hex(hex: &str) -> ImgcacheResult<Self> {
        let digits = hex.strip_prefix('#').ok_or_else(|| {
            ImgcacheError::ConfigValue(format!("fill color {hex} must start with '#'"))
        })?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ImgcacheError::ConfigValue(format!(
                "fill color {hex} is not a #rrggbb value"
            )));
        }
        // length and digit checks above make these infallible
        let r = u8::from_str_radix(&digits[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&digits[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&digits[4..6], 16).unwrap_or(0);
        Ok(Self { r, g, b })
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// How a source image is mapped onto the target geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMode {
    /// Truncate to the target bounds, no scaling or padding
    Crop,
    /// Paint the canvas with the fill color, then draw the source over it
    Fill,
    /// Non-uniform resample to exactly the target bounds
    Skew,
}

impl ScaleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crop => "crop",
            Self::Fill => "fill",
            Self::Skew => "skew",
        }
    }
}

/// Encoded output formats, doubling as the closed set of file-name
/// extensions accepted on inbound requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpg,
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Look up a format by file-name extension, case-insensitive
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpg | Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }
}

/// A named output specification. Immutable once constructed; identity is
/// the name, which is also the storage tier the variants live under.
#[derive(Debug, Clone)]
pub struct ImageProfile {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    pub scale_mode: ScaleMode,
    pub fill_color: Option<Color>,
    pub format: OutputFormat,
}

impl ImageProfile {
    /// Construct a profile, validating the quality range and the
    /// fill-color rules. Violations are configuration errors raised at
    /// startup, never at request time.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        quality: u8,
        scale_mode: ScaleMode,
        fill_color_hex: Option<&str>,
        format: OutputFormat,
    ) -> ImgcacheResult<Self> {
        let name = name.into();
        if quality > 100 {
            return Err(ImgcacheError::ConfigValue(format!(
                "profile {name}: quality must be in range 0-100"
            )));
        }
        if width == 0 || height == 0 {
            return Err(ImgcacheError::ConfigValue(format!(
                "profile {name}: width and height must be positive"
            )));
        }
        let fill_color = match (scale_mode, fill_color_hex) {
            (ScaleMode::Fill, Some(hex)) => Some(Color::from_hex(hex)?),
            (ScaleMode::Fill, None) => {
                return Err(ImgcacheError::ConfigValue(format!(
                    "profile {name}: fill mode requires a fill color"
                )));
            }
            (_, Some(_)) => {
                return Err(ImgcacheError::ConfigValue(format!(
                    "profile {name}: fill color is only valid for fill mode"
                )));
            }
            (_, None) => None,
        };
        Ok(Self {
            name,
            width,
            height,
            quality,
            scale_mode,
            fill_color,
            format,
        })
    }
}

/// The closed, read-only set of profiles, keyed by name
#[derive(Debug)]
pub struct ProfileCatalog {
    profiles: HashMap<String, ImageProfile>,
}

impl ProfileCatalog {
    /// The built-in catalog
    pub fn builtin() -> ImgcacheResult<Self> {
        Self::from_profiles(vec![
            ImageProfile::new("thumbnail", 1000, 500, 10, ScaleMode::Crop, None, OutputFormat::Jpg)?,
            ImageProfile::new(
                "technical-drawing",
                1000,
                1000,
                10,
                ScaleMode::Fill,
                Some("#00ff00"),
                OutputFormat::Png,
            )?,
            ImageProfile::new("icon", 200, 200, 10, ScaleMode::Skew, None, OutputFormat::Png)?,
        ])
    }

    /// Build a catalog from an explicit profile list. The reserved
    /// `original` tier may not be shadowed by a profile.
    pub fn from_profiles(profiles: Vec<ImageProfile>) -> ImgcacheResult<Self> {
        let mut map = HashMap::new();
        for profile in profiles {
            if profile.name == ORIGINAL_TIER {
                return Err(ImgcacheError::ConfigValue(format!(
                    "profile name {ORIGINAL_TIER} is reserved"
                )));
            }
            if map.insert(profile.name.clone(), profile).is_some() {
                return Err(ImgcacheError::ConfigValue(
                    "duplicate profile name in catalog".to_string(),
                ));
            }
        }
        Ok(Self { profiles: map })
    }

    /// Look up a profile by name
    pub fn find(&self, name: &str) -> Option<&ImageProfile> {
        self.profiles.get(name)
    }

    /// Names of every profile in the catalog
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// All profiles, for display
    pub fn profiles(&self) -> impl Iterator<Item = &ImageProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
