//! Locator validation
//!
//! Turns a [`StreamDescriptor`] into a [`ResolvedStream`] before the
//! controller touches any player state. Embedded locators must carry a
//! provider video id; direct locators only need to be non-empty.

use crate::{Error, Result, StreamDescriptor, StreamKind};
use regex::Regex;
use std::sync::LazyLock;

/// Length of a provider video id
pub const VIDEO_ID_LEN: usize = 11;

/// Id following `v=` or a path separator, not followed by another id character
static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)")
        .expect("video id regex is a constant and always valid")
});

/// Provider video identifier, always 11 characters of `[0-9A-Za-z_-]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the provider video id from an origin-page URL
pub fn extract_video_id(locator: &str) -> Option<VideoId> {
    VIDEO_ID_REGEX
        .captures(locator)
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
}

/// A descriptor whose locator has been checked for its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedStream {
    Embedded { video_id: VideoId },
    Progressive { url: String },
    Adaptive { url: String },
}

impl ResolvedStream {
    /// Validate a descriptor's locator
    pub fn resolve(descriptor: &StreamDescriptor) -> Result<Self> {
        let locator = descriptor.locator();
        let kind = descriptor.kind();

        if locator.trim().is_empty() {
            return Err(Error::InvalidLocator {
                kind,
                locator: locator.to_string(),
                reason: "empty locator",
            });
        }

        match kind {
            StreamKind::Embedded => extract_video_id(locator)
                .map(|video_id| ResolvedStream::Embedded { video_id })
                .ok_or_else(|| Error::InvalidLocator {
                    kind,
                    locator: locator.to_string(),
                    reason: "no 11-character video id",
                }),
            StreamKind::Progressive => Ok(ResolvedStream::Progressive {
                url: locator.to_string(),
            }),
            StreamKind::Adaptive => Ok(ResolvedStream::Adaptive {
                url: locator.to_string(),
            }),
        }
    }

    pub fn kind(&self) -> StreamKind {
        match self {
            ResolvedStream::Embedded { .. } => StreamKind::Embedded,
            ResolvedStream::Progressive { .. } => StreamKind::Progressive,
            ResolvedStream::Adaptive { .. } => StreamKind::Adaptive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(locator: &str) -> Option<String> {
        extract_video_id(locator).map(|v| v.as_str().to_string())
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            id("https://example.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_short_and_embed_urls() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            id("https://www.youtube.com/embed/dQw4w9WgXcQ?start=5").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            id("https://www.youtube.com/watch?v=a_b-c_d-e_f&t=42s").as_deref(),
            Some("a_b-c_d-e_f")
        );
    }

    #[test]
    fn test_no_id() {
        assert_eq!(id("https://example.com/clip"), None);
        assert_eq!(id(""), None);
        assert_eq!(id("dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_longer_token_is_not_truncated() {
        assert_eq!(id("https://example.com/watch?v=dQw4w9WgXcQxyz"), None);
        assert_eq!(id("https://example.com/dQw4w9WgXcQ1"), None);
    }

    #[test]
    fn test_extracted_id_length() {
        let locators = [
            "https://example.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/0123456789_",
            "https://m.youtube.com/watch?feature=share&v=-_-_-_-_-_-",
        ];
        for locator in locators {
            let video_id = extract_video_id(locator).unwrap();
            assert_eq!(video_id.as_str().len(), VIDEO_ID_LEN, "{}", locator);
            assert!(locator.contains(video_id.as_str()));
        }
    }

    #[test]
    fn test_resolve_embedded() {
        let resolved =
            ResolvedStream::resolve(&StreamDescriptor::embedded("https://youtu.be/dQw4w9WgXcQ"))
                .unwrap();
        assert_eq!(resolved.kind(), StreamKind::Embedded);
    }

    #[test]
    fn test_resolve_rejects_empty_direct_locator() {
        let err = ResolvedStream::resolve(&StreamDescriptor::progressive("   ")).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidLocator {
                kind: StreamKind::Progressive,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_keeps_direct_locator_verbatim() {
        let resolved = ResolvedStream::resolve(&StreamDescriptor::adaptive("not a url")).unwrap();
        assert_eq!(
            resolved,
            ResolvedStream::Adaptive {
                url: "not a url".into()
            }
        );
    }
}
