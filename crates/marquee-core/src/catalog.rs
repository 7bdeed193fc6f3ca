//! Catalog document model
//!
//! The catalog is a JSON array of channels and series:
//!
//! ```json
//! [
//!   { "name": "News 24", "logo": "news.png", "category": "News",
//!     "type": "hls", "stream": { "type": "hls", "url": "https://.../live.m3u8" } },
//!   { "name": "Docs", "logo": "docs.png", "category": "Series", "type": "series",
//!     "seasons": [ { "season": 1, "episodes": [
//!       { "title": "Pilot", "type": "youtube", "url": "https://youtu.be/dQw4w9WgXcQ" } ] } ] }
//! ]
//! ```

use crate::{Error, Result, StreamDescriptor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Item type marking a series
pub const SERIES_TYPE: &str = "series";

/// The full catalog, in document order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub items: Vec<CatalogItem>,
}

/// A channel, movie or series card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub category: String,
    /// `series` or a stream type
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<Season>,
    /// `None` when absent or not a supported stream
    #[serde(
        default,
        deserialize_with = "lenient_stream",
        skip_serializing_if = "Option::is_none"
    )]
    pub stream: Option<StreamDescriptor>,
}

/// An unplayable descriptor leaves its card inert instead of failing the
/// whole document
fn playable(value: serde_json::Value) -> Option<StreamDescriptor> {
    match serde_json::from_value(value) {
        Ok(descriptor) => Some(descriptor),
        Err(e) => {
            warn!(error = %e, "Skipping unsupported stream descriptor");
            None
        }
    }
}

fn lenient_stream<'de, D>(deserializer: D) -> std::result::Result<Option<StreamDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<serde_json::Value>::deserialize(deserializer)?.and_then(playable))
}

/// What selecting a card does
#[derive(Debug, Clone, Copy)]
pub enum CatalogEntry<'a> {
    /// Open the episode list
    Series(&'a [Season]),
    /// Play right away
    Stream(&'a StreamDescriptor),
}

impl CatalogItem {
    pub fn is_series(&self) -> bool {
        self.item_type == SERIES_TYPE
    }

    /// `None` for a non-series item without a stream
    pub fn entry(&self) -> Option<CatalogEntry<'_>> {
        if self.is_series() {
            Some(CatalogEntry::Series(&self.seasons))
        } else {
            self.stream.as_ref().map(CatalogEntry::Stream)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<SeasonLabel>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// Season numbers are usually integers but some catalogs use text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeasonLabel {
    Number(u32),
    Text(String),
}

impl std::fmt::Display for SeasonLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeasonLabel::Number(n) => write!(f, "{}", n),
            SeasonLabel::Text(s) => f.write_str(s),
        }
    }
}

impl Season {
    /// Heading shown above the season's episodes
    pub fn heading(&self) -> String {
        match &self.season {
            Some(label) => format!("Season {}", label),
            None => "Season".to_string(),
        }
    }
}

/// An episode is itself a playable descriptor with a title
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "EpisodeDocument")]
pub struct Episode {
    pub title: String,
    /// `None` when the episode's descriptor is not a supported stream
    #[serde(flatten)]
    pub stream: Option<StreamDescriptor>,
}

#[derive(Deserialize)]
struct EpisodeDocument {
    #[serde(default)]
    title: String,
    #[serde(flatten)]
    descriptor: serde_json::Map<String, serde_json::Value>,
}

impl From<EpisodeDocument> for Episode {
    fn from(doc: EpisodeDocument) -> Self {
        Self {
            title: doc.title,
            stream: playable(serde_json::Value::Object(doc.descriptor)),
        }
    }
}

/// Items sharing a category, in first-appearance order
#[derive(Debug, Clone)]
pub struct CategoryGroup<'a> {
    pub name: &'a str,
    pub items: Vec<&'a CatalogItem>,
}

/// A playable stream found while walking the catalog
#[derive(Debug, Clone)]
pub struct CatalogStream<'a> {
    /// `Channel` or `Series / Season 1 / Episode`
    pub label: String,
    pub category: &'a str,
    pub descriptor: &'a StreamDescriptor,
}

impl Catalog {
    /// Parse a catalog document
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| Error::CatalogParse(e.to_string()))?;
        debug!(items = catalog.items.len(), "Catalog parsed");
        Ok(catalog)
    }

    /// Fetch and parse the catalog, bypassing HTTP caches
    #[cfg(feature = "fetch")]
    pub async fn fetch(client: &reqwest::Client, url: &url::Url) -> Result<Self> {
        tracing::info!(url = %url, "Fetching catalog");

        let response = client
            .get(url.clone())
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| Error::CatalogLoad(e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| Error::CatalogLoad(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::CatalogLoad(e.to_string()))?;

        Self::from_json(&body)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an item by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }

    /// Group items by category, keeping document order
    pub fn group_by_category(&self) -> Vec<CategoryGroup<'_>> {
        let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for item in &self.items {
            let category = item.category.as_str();
            let slot = *index.entry(category).or_insert_with(|| {
                groups.push(CategoryGroup {
                    name: category,
                    items: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].items.push(item);
        }

        groups
    }

    /// Every playable stream, series expanded into their episodes
    pub fn streams(&self) -> Vec<CatalogStream<'_>> {
        let mut streams = Vec::new();

        for item in &self.items {
            match item.entry() {
                Some(CatalogEntry::Stream(descriptor)) => streams.push(CatalogStream {
                    label: item.name.clone(),
                    category: &item.category,
                    descriptor,
                }),
                Some(CatalogEntry::Series(seasons)) => {
                    for season in seasons {
                        for episode in &season.episodes {
                            let Some(descriptor) = &episode.stream else {
                                continue;
                            };
                            streams.push(CatalogStream {
                                label: format!("{} / {} / {}", item.name, season.heading(), episode.title),
                                category: &item.category,
                                descriptor,
                            });
                        }
                    }
                }
                None => {}
            }
        }

        streams
    }
}
