//! Error types for the catalog, export and configuration layers

use std::path::PathBuf;
use thiserror::Error;

/// A catalog retrieval that did not produce a usable value.
///
/// Never cached. Callers decide whether to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to fetch {key}: {cause}")]
pub struct FetchError {
    /// The request key (URL) that failed
    pub key: String,
    #[source]
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(key: impl Into<String>, cause: FetchCause) -> Self {
        Self {
            key: key.into(),
            cause,
        }
    }

    pub fn status(key: impl Into<String>, status: u16) -> Self {
        Self::new(key, FetchCause::Status(status))
    }

    pub fn transport(key: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::new(key, FetchCause::Transport(message.to_string()))
    }

    pub fn decode(key: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::new(key, FetchCause::Decode(message.to_string()))
    }
}

/// Underlying reason for a [`FetchError`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchCause {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Failure of a single rendering strategy
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No rendering strategies configured")]
    NoStrategies,

    #[error("Canvas of {width}x{height} exceeds the maximum export size")]
    CanvasTooLarge { width: u32, height: u32 },

    #[error("Sprite {url} could not be loaded: {reason}")]
    Sprite { url: String, reason: String },

    #[error("Font {name} could not be loaded: {reason}")]
    Font { name: String, reason: String },

    #[error("PNG encoding failed")]
    Encode(#[from] image::ImageError),
}

/// Export-time failures. Surfaced as a transient status, never fatal.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Clipboard is not available on this system")]
    ClipboardUnsupported,

    #[error("Native sharing is not available on this system")]
    ShareUnsupported,

    #[error("Image generation failed: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to write image to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy image to clipboard: {0}")]
    Clipboard(String),

    #[error("Failed to share image: {0}")]
    Share(String),

    #[error("Failed to open {url}: {reason}")]
    Opener { url: String, reason: String },
}

/// Configuration loading and validation failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
