//! Error types for imgcache
//!
//! All modules use `ImgcacheResult<T>` as their return type. Every error is
//! kind-tagged so the HTTP boundary can map kinds to status codes without
//! inspecting message text.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for imgcache operations
pub type ImgcacheResult<T> = Result<T, ImgcacheError>;

/// All errors that can occur in imgcache
#[derive(Error, Debug)]
pub enum ImgcacheError {
    // Request validation errors
    #[error("Bad request: {reason}")]
    BadRequest { reason: String },

    #[error("Unknown image profile: {name}")]
    UnknownProfile { name: String },

    // Cache and origin lookup errors
    #[error("Not found in storage: {key}")]
    NotFound { key: String },

    #[error("Image {name} not found at origin")]
    NotFoundInSource { name: String },

    #[error("Origin request failed: {detail}")]
    Loader {
        detail: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    // Image processing errors
    #[error("Image processing failed: {detail}")]
    Processing {
        detail: String,
        #[source]
        source: image::ImageError,
    },

    // Durable store errors
    #[error("Storage rejected request for {key}")]
    StorageRejected {
        key: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Storage unavailable for {key}")]
    StorageUnavailable {
        key: String,
        #[source]
        source: object_store::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ConfigValue(String),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ImgcacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an origin loader error without an underlying transport cause
    pub fn loader(detail: impl Into<String>) -> Self {
        Self::Loader {
            detail: detail.into(),
            source: None,
        }
    }

    /// Create an image processing error wrapping the codec failure
    pub fn processing(detail: impl Into<String>, source: image::ImageError) -> Self {
        Self::Processing {
            detail: detail.into(),
            source,
        }
    }

    /// Whether this is a storage miss, the signal that the tiered lookup
    /// falls through to the next tier
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether a write that failed this way may succeed if repeated.
    /// Client-class failures (`StorageRejected`) never do.
    pub fn is_transient_storage(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigValue(_) => Some("Check the [source] and [storage] sections of config.toml"),
            Self::UnknownProfile { .. } => Some("Run: imgcache profiles"),
            _ => None,
        }
    }
}
