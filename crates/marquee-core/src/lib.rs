//! Marquee Core - Catalog Player Library
//!
//! This crate provides the playback logic behind the Marquee catalog:
//! - Stream descriptors and locator validation
//! - Backend dispatch (embedded provider, progressive file, adaptive stream)
//! - Playback session state with stale-operation detection
//! - Catalog document parsing and grouping
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Marquee Core                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐        ┌──────────────┐                       │
//! │  │   Catalog    │        │   Locator    │                       │
//! │  │    Model     │───────▶│  Validation  │                       │
//! │  └──────────────┘        └──────┬───────┘                       │
//! │                                 │                               │
//! │                          ┌──────┴──────┐     ┌──────────────┐   │
//! │                          │  Playback   │────▶│   Session    │   │
//! │                          │ Controller  │     │ (watch chan) │   │
//! │                          └──────┬──────┘     └──────────────┘   │
//! │                                 │                               │
//! │  ┌──────────────┐  ┌────────────┴─┐  ┌──────────────┐           │
//! │  │   Embedded   │  │ Progressive  │  │   Adaptive   │           │
//! │  │   Backend    │  │   Backend    │  │   Backend    │           │
//! │  └──────────────┘  └──────────────┘  └──────────────┘           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Platform objects (media element, embed frame, adaptive engine,
//! presentation surface) are traits in [`backend`]; `marquee-wasm`
//! implements them on the DOM and `marquee-cli` headlessly.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod locator;
pub mod session;
pub mod types;

pub use backend::{
    AdaptiveEngine, Backend, EmbedFrame, EngineFactory, MediaElement, PlatformError,
    PlatformResult, PresentationSurface,
};
pub use catalog::{Catalog, CatalogEntry, CatalogItem, CategoryGroup, Episode, Season};
pub use config::PlayerConfig;
pub use controller::PlaybackController;
pub use error::{Error, Result};
pub use locator::{extract_video_id, ResolvedStream, VideoId};
pub use session::{OperationToken, PlaybackSession};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the player library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Marquee Core initialized");
}
