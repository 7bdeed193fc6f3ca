//! Core types for Marquee

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a playback controller's session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery mechanism of a stream.
///
/// Catalogs use the provider-flavoured names (`youtube`, `mp4`, `hls`);
/// the generic names are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    /// Third-party provider rendered in an embedded frame
    #[serde(rename = "youtube", alias = "embedded")]
    Embedded,
    /// Direct file played by the native media element
    #[serde(rename = "mp4", alias = "progressive")]
    Progressive,
    /// Manifest-based stream played through the adaptive engine
    #[serde(rename = "hls", alias = "adaptive")]
    Adaptive,
}

impl StreamKind {
    pub const ALL: [StreamKind; 3] = [
        StreamKind::Embedded,
        StreamKind::Progressive,
        StreamKind::Adaptive,
    ];

    /// Name used in catalog documents
    pub fn wire_name(&self) -> &'static str {
        match self {
            StreamKind::Embedded => "youtube",
            StreamKind::Progressive => "mp4",
            StreamKind::Adaptive => "hls",
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Embedded => write!(f, "embedded"),
            StreamKind::Progressive => write!(f, "progressive"),
            StreamKind::Adaptive => write!(f, "adaptive"),
        }
    }
}

impl FromStr for StreamKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "youtube" | "embedded" => Ok(StreamKind::Embedded),
            "mp4" | "progressive" => Ok(StreamKind::Progressive),
            "hls" | "adaptive" => Ok(StreamKind::Adaptive),
            other => Err(format!("unknown stream type '{}'", other)),
        }
    }
}

/// One playable item: how it is delivered and where it lives.
///
/// Descriptors are values; once built they are never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamDescriptor {
    #[serde(rename = "type")]
    kind: StreamKind,
    #[serde(rename = "url", alias = "locator")]
    locator: String,
}

impl StreamDescriptor {
    pub fn new(kind: StreamKind, locator: impl Into<String>) -> Self {
        Self {
            kind,
            locator: locator.into(),
        }
    }

    pub fn embedded(locator: impl Into<String>) -> Self {
        Self::new(StreamKind::Embedded, locator)
    }

    pub fn progressive(locator: impl Into<String>) -> Self {
        Self::new(StreamKind::Progressive, locator)
    }

    pub fn adaptive(locator: impl Into<String>) -> Self {
        Self::new(StreamKind::Adaptive, locator)
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }
}

/// Which backend currently owns the playback surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveBackend {
    #[default]
    None,
    Embedded,
    Progressive,
    Adaptive,
}

impl From<StreamKind> for ActiveBackend {
    fn from(kind: StreamKind) -> Self {
        match kind {
            StreamKind::Embedded => ActiveBackend::Embedded,
            StreamKind::Progressive => ActiveBackend::Progressive,
            StreamKind::Adaptive => ActiveBackend::Adaptive,
        }
    }
}

impl std::fmt::Display for ActiveBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveBackend::None => write!(f, "none"),
            ActiveBackend::Embedded => write!(f, "embedded"),
            ActiveBackend::Progressive => write!(f, "progressive"),
            ActiveBackend::Adaptive => write!(f, "adaptive"),
        }
    }
}

/// Observable state of the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub active_backend: ActiveBackend,
    pub surface_visible: bool,
    /// Token of the latest `play`/`close` call
    pub operation: u64,
    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn at_rest(session_id: SessionId) -> Self {
        Self {
            session_id,
            active_backend: ActiveBackend::None,
            surface_visible: false,
            operation: 0,
            updated_at: Utc::now(),
        }
    }
}

/// How a `play` call ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlaybackOutcome {
    /// The backend is playing and owns the surface
    Started { kind: StreamKind },
    /// A later `play` or `close` took over before this one finished
    Superseded { kind: StreamKind },
}

impl PlaybackOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, PlaybackOutcome::Started { .. })
    }
}
