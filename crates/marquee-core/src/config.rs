//! Player configuration

use crate::{locator::VideoId, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base of the provider's embed endpoint; the video id is appended
    pub embed_base_url: String,
    /// Ask the provider to start playing immediately
    pub autoplay: bool,
    /// Ask the provider to play inline on mobile browsers
    pub inline_playback: bool,
    /// Request fullscreen once a backend starts
    pub fullscreen_on_start: bool,
    /// Location of the catalog document
    pub catalog_url: String,
    /// Request timeout in milliseconds (native HTTP only)
    pub request_timeout_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            embed_base_url: "https://www.youtube.com/embed".to_string(),
            autoplay: true,
            inline_playback: true,
            fullscreen_on_start: true,
            catalog_url: "chn.json".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl PlayerConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.embed_base_url).map_err(|e| {
            Error::InvalidConfig(format!("embed_base_url {:?}: {}", self.embed_base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!(
                "embed_base_url {:?} cannot be a base",
                self.embed_base_url
            )));
        }
        if self.catalog_url.trim().is_empty() {
            return Err(Error::InvalidConfig("catalog_url is empty".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(Error::InvalidConfig("request_timeout_ms must be > 0".to_string()));
        }
        Ok(())
    }

    /// Embed frame source for a provider video
    pub fn embed_source(&self, video_id: &VideoId) -> String {
        format!(
            "{}/{}?autoplay={}&playsinline={}",
            self.embed_base_url.trim_end_matches('/'),
            video_id,
            u8::from(self.autoplay),
            u8::from(self.inline_playback),
        )
    }
}
