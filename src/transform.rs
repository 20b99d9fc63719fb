//! Image transform engine
//!
//! Deterministically re-renders raw image bytes into a profile's output
//! geometry and format. Every call decodes into a private canvas; no
//! pixel buffer is ever shared between requests.

use crate::error::{ImgcacheError, ImgcacheResult};
use crate::profile::{ImageProfile, OutputFormat, ProfileCatalog, ScaleMode};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Capability to derive a processed variant from raw bytes
pub trait ImageProcessor: Send + Sync {
    /// Render `raw` for the given tier. An unrecognized tier (such as the
    /// reserved `original` pseudo-tier) passes the bytes through
    /// unchanged; rejecting unknown profiles is the validator's job, not
    /// this one's.
    fn process(&self, raw: &Bytes, tier_name: &str) -> ImgcacheResult<Bytes>;

    /// Names of every profile this processor can render
    fn profile_names(&self) -> Vec<String>;
}

/// [`ImageProcessor`] over the shared profile catalog
pub struct Transformer {
    catalog: Arc<ProfileCatalog>,
}

impl Transformer {
    pub fn new(catalog: Arc<ProfileCatalog>) -> Self {
        Self { catalog }
    }

    /// Render raw bytes to a profile's geometry and format
    pub fn render(raw: &[u8], profile: &ImageProfile) -> ImgcacheResult<Vec<u8>> {
        let source = image::load_from_memory(raw)
            .map_err(|e| ImgcacheError::processing("failed to decode source image", e))?;
        let canvas = match profile.scale_mode {
            ScaleMode::Crop => crop(&source, profile),
            ScaleMode::Fill => fill(&source, profile)?,
            ScaleMode::Skew => skew(&source, profile),
        };
        encode(canvas, profile)
    }
}

impl ImageProcessor for Transformer {
    fn process(&self, raw: &Bytes, tier_name: &str) -> ImgcacheResult<Bytes> {
        let Some(profile) = self.catalog.find(tier_name) else {
            debug!(tier = tier_name, "no profile for tier, passing image through unchanged");
            return Ok(raw.clone());
        };
        Self::render(raw, profile).map(Bytes::from)
    }

    fn profile_names(&self) -> Vec<String> {
        self.catalog.names().map(str::to_string).collect()
    }
}

/// Truncate to the target bounds: source drawn at the origin unscaled,
/// overhang clipped, uncovered canvas left at the default background.
fn crop(source: &DynamicImage, profile: &ImageProfile) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(profile.width, profile.height, Rgba([0, 0, 0, 255]));
    imageops::replace(&mut canvas, &source.to_rgba8(), 0, 0);
    canvas
}

/// Pre-paint the canvas with the fill color, then draw the source over it
/// at the origin. Uncovered area and transparent source pixels keep the
/// fill color; overhang is clipped exactly as in crop.
fn fill(source: &DynamicImage, profile: &ImageProfile) -> ImgcacheResult<RgbaImage> {
    let color = profile.fill_color.ok_or_else(|| {
        // unreachable for catalog profiles, which are validated at startup
        ImgcacheError::Internal(format!("fill profile {} has no color", profile.name))
    })?;
    let mut canvas = RgbaImage::from_pixel(
        profile.width,
        profile.height,
        Rgba([color.r, color.g, color.b, 255]),
    );
    imageops::overlay(&mut canvas, &source.to_rgba8(), 0, 0);
    Ok(canvas)
}

/// Resample each axis independently to the target bounds, ignoring the
/// source aspect ratio.
fn skew(source: &DynamicImage, profile: &ImageProfile) -> RgbaImage {
    source
        .resize_exact(profile.width, profile.height, FilterType::Triangle)
        .to_rgba8()
}

fn encode(canvas: RgbaImage, profile: &ImageProfile) -> ImgcacheResult<Vec<u8>> {
    let mut out = Vec::new();
    match profile.format {
        OutputFormat::Jpg | OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut out, profile.quality);
            rgb.write_with_encoder(encoder)
                .map_err(|e| ImgcacheError::processing("failed to encode jpeg output", e))?;
        }
        OutputFormat::Png => {
            DynamicImage::ImageRgba8(canvas)
                .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
                .map_err(|e| ImgcacheError::processing("failed to encode png output", e))?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const RED: [u8; 3] = [255, 0, 0];
    const GREEN: [u8; 3] = [0, 255, 0];
    const BLACK: [u8; 3] = [0, 0, 0];

    fn png_source(width: u32, height: u32, color: [u8; 3]) -> Bytes {
        let img = RgbImage::from_pixel(width, height, Rgb(color));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        Bytes::from(buf.into_inner())
    }

    fn png_profile(mode: ScaleMode, width: u32, height: u32, fill: Option<&str>) -> ImageProfile {
        ImageProfile::new("test", width, height, 80, mode, fill, OutputFormat::Png).unwrap()
    }

    fn rgb_at(encoded: &[u8], x: u32, y: u32) -> [u8; 3] {
        let img = image::load_from_memory(encoded).unwrap().to_rgb8();
        img.get_pixel(x, y).0
    }

    #[test]
    fn crop_smaller_source_sits_at_origin_on_untouched_background() {
        let source = png_source(3, 3, RED);
        let profile = png_profile(ScaleMode::Crop, 8, 4, None);
        let out = Transformer::render(&source, &profile).unwrap();

        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (8, 4));
        assert_eq!(rgb_at(&out, 0, 0), RED);
        assert_eq!(rgb_at(&out, 2, 2), RED);
        assert_eq!(rgb_at(&out, 7, 3), BLACK);
    }

    #[test]
    fn crop_larger_source_is_clipped_to_canvas() {
        let source = png_source(10, 10, RED);
        let profile = png_profile(ScaleMode::Crop, 4, 4, None);
        let out = Transformer::render(&source, &profile).unwrap();

        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (4, 4));
        assert_eq!(rgb_at(&out, 3, 3), RED);
    }

    #[test]
    fn fill_paints_uncovered_area_with_profile_color() {
        let source = png_source(2, 2, RED);
        let profile = png_profile(ScaleMode::Fill, 6, 6, Some("#00ff00"));
        let out = Transformer::render(&source, &profile).unwrap();

        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (6, 6));
        assert_eq!(rgb_at(&out, 0, 0), RED);
        assert_eq!(rgb_at(&out, 5, 5), GREEN);
        assert_eq!(rgb_at(&out, 2, 0), GREEN);
    }

    #[test]
    fn skew_forces_exact_geometry_regardless_of_aspect() {
        let source = png_source(8, 2, RED);
        let profile = png_profile(ScaleMode::Skew, 5, 5, None);
        let out = Transformer::render(&source, &profile).unwrap();

        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (5, 5));
        assert_eq!(rgb_at(&out, 2, 2), RED);
    }

    #[test]
    fn jpeg_output_is_encoded_with_target_geometry() {
        let source = png_source(3, 3, RED);
        let profile =
            ImageProfile::new("test", 8, 4, 10, ScaleMode::Crop, None, OutputFormat::Jpg).unwrap();
        let out = Transformer::render(&source, &profile).unwrap();

        assert_eq!(
            image::guess_format(&out).unwrap(),
            image::ImageFormat::Jpeg
        );
        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (8, 4));
    }

    #[test]
    fn undecodable_bytes_are_a_processing_error() {
        let profile = png_profile(ScaleMode::Crop, 4, 4, None);
        let err = Transformer::render(b"definitely not pixels", &profile).unwrap_err();
        assert!(matches!(err, ImgcacheError::Processing { .. }));
    }

    #[test]
    fn unknown_tier_passes_bytes_through() {
        let catalog = Arc::new(ProfileCatalog::builtin().unwrap());
        let transformer = Transformer::new(catalog);
        let raw = Bytes::from_static(b"opaque raw bytes");
        let out = transformer.process(&raw, "original").unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn known_tier_renders_through_catalog() {
        let catalog = Arc::new(ProfileCatalog::builtin().unwrap());
        let transformer = Transformer::new(catalog);
        let out = transformer
            .process(&png_source(3, 3, RED), "icon")
            .unwrap();
        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (200, 200));
    }

    #[test]
    fn profile_names_match_catalog() {
        let catalog = Arc::new(ProfileCatalog::builtin().unwrap());
        let transformer = Transformer::new(catalog);
        let mut names = transformer.profile_names();
        names.sort();
        assert_eq!(names, vec!["icon", "technical-drawing", "thumbnail"]);
    }
}
