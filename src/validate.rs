//! Request validation
//!
//! Syntactic checks on the profile name and image reference, run at the
//! boundary before any store access. The reserved `original` tier is
//! asymmetric: it can be flushed (taking every derivative with it) but
//! never requested for display.

use crate::error::{ImgcacheError, ImgcacheResult};
use crate::profile::{OutputFormat, ProfileCatalog, ORIGINAL_TIER};
use std::sync::Arc;

/// Validates inbound request fields against the profile catalog
pub struct RequestValidator {
    catalog: Arc<ProfileCatalog>,
}

impl RequestValidator {
    pub fn new(catalog: Arc<ProfileCatalog>) -> Self {
        Self { catalog }
    }

    /// A show request must name a catalog profile
    pub fn check_profile_for_fetch(&self, profile_name: &str) -> ImgcacheResult<()> {
        if self.catalog.find(profile_name).is_none() {
            return Err(ImgcacheError::UnknownProfile {
                name: profile_name.to_string(),
            });
        }
        Ok(())
    }

    /// A flush request may also name the reserved `original` tier
    pub fn check_profile_for_delete(&self, profile_name: &str) -> ImgcacheResult<()> {
        if profile_name == ORIGINAL_TIER {
            return Ok(());
        }
        self.check_profile_for_fetch(profile_name)
    }

    /// An image reference must be non-blank and carry a known extension
    pub fn check_image_name(&self, image_name: &str) -> ImgcacheResult<()> {
        if image_name.trim().is_empty() {
            return Err(ImgcacheError::BadRequest {
                reason: "image name must not be empty".to_string(),
            });
        }
        let Some(dot) = image_name.rfind('.') else {
            return Err(ImgcacheError::BadRequest {
                reason: format!("image name {image_name} has no extension"),
            });
        };
        let extension = &image_name[dot + 1..];
        if OutputFormat::from_extension(extension).is_none() {
            return Err(ImgcacheError::BadRequest {
                reason: format!("unsupported image extension: {extension}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> RequestValidator {
        RequestValidator::new(Arc::new(ProfileCatalog::builtin().unwrap()))
    }

    #[test]
    fn fetch_accepts_catalog_profiles_only() {
        let v = validator();
        assert!(v.check_profile_for_fetch("thumbnail").is_ok());
        assert!(v.check_profile_for_fetch("icon").is_ok());
        assert!(matches!(
            v.check_profile_for_fetch("poster"),
            Err(ImgcacheError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn original_is_not_fetchable_but_is_deletable() {
        let v = validator();
        assert!(v.check_profile_for_fetch("original").is_err());
        assert!(v.check_profile_for_delete("original").is_ok());
        assert!(v.check_profile_for_delete("thumbnail").is_ok());
        assert!(v.check_profile_for_delete("poster").is_err());
    }

    #[test]
    fn image_name_requires_known_extension() {
        let v = validator();
        assert!(v.check_image_name("photo.jpg").is_ok());
        assert!(v.check_image_name("photo.JPEG").is_ok());
        assert!(v.check_image_name("diagram.png").is_ok());

        assert!(matches!(
            v.check_image_name(""),
            Err(ImgcacheError::BadRequest { .. })
        ));
        assert!(matches!(
            v.check_image_name("   "),
            Err(ImgcacheError::BadRequest { .. })
        ));
        assert!(matches!(
            v.check_image_name("noextension"),
            Err(ImgcacheError::BadRequest { .. })
        ));
        assert!(matches!(
            v.check_image_name("photo.webp"),
            Err(ImgcacheError::BadRequest { .. })
        ));
    }
}
