//! Error types for Marquee Core

use crate::types::StreamKind;
use thiserror::Error;

/// Result type alias for player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Player error types
#[derive(Error, Debug)]
pub enum Error {
    // Catalog errors
    #[error("Failed to load catalog: {0}")]
    CatalogLoad(String),

    #[error("Failed to parse catalog: {0}")]
    CatalogParse(String),

    // Descriptor errors
    #[error("Invalid {kind} locator {locator:?}: {reason}")]
    InvalidLocator {
        kind: StreamKind,
        locator: String,
        reason: &'static str,
    },

    // Backend errors
    #[error("{kind} backend failed to start: {reason}")]
    BackendStart { kind: StreamKind, reason: String },

    #[error("Adaptive engine unavailable: {0}")]
    EngineUnavailable(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Network errors
    #[cfg(feature = "fetch")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a backend start failure
    pub fn backend(kind: StreamKind, reason: impl Into<String>) -> Self {
        Error::BackendStart {
            kind,
            reason: reason.into(),
        }
    }

    /// Returns true if this error aborts a playback request before any
    /// player state was touched
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::InvalidLocator { .. })
    }

    /// Message shown to the user when this error reaches the surface
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::CatalogLoad(_) | Error::CatalogParse(_) => "Failed to load channels",
            Error::InvalidLocator {
                kind: StreamKind::Embedded,
                ..
            } => "Invalid YouTube URL",
            Error::InvalidLocator { .. } => "Invalid stream URL",
            Error::BackendStart { .. } | Error::EngineUnavailable(_) => "Failed to play stream",
            _ => "Something went wrong",
        }
    }

    /// Returns the error code for logs and the JS boundary
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::CatalogLoad(_) => "CATALOG_LOAD",
            Error::CatalogParse(_) => "CATALOG_PARSE",
            Error::InvalidLocator { .. } => "INVALID_LOCATOR",
            Error::BackendStart { .. } => "BACKEND_START",
            Error::EngineUnavailable(_) => "ENGINE_UNAVAILABLE",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            #[cfg(feature = "fetch")]
            Error::Network(_) => "NETWORK",
            Error::Json(_) => "JSON",
            Error::Io(_) => "IO",
        }
    }
}
