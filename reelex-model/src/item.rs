//! Immutable feed content records.
//!
//! A [`FeedItem`] is owned by the hosting application's content source and is
//! read-only to the engine. Playback state is tracked separately, keyed by
//! [`VideoId`](crate::ids::VideoId).

use crate::error::{ModelError, Result};
use crate::ids::{AuthorId, VideoId};
use url::Url;

/// Media locations for a single video.
///
/// `url` is the progressive (natively decodable) source; `hls_url` is the
/// adaptive-bitrate manifest used when native playback of `url` is not
/// available on the host surface.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaSources {
    pub url: Url,
    pub hls_url: Option<Url>,
    pub thumbnail: Option<Url>,
}

impl MediaSources {
    pub fn progressive(url: Url) -> Self {
        Self {
            url,
            hls_url: None,
            thumbnail: None,
        }
    }

    pub fn with_hls(url: Url, hls_url: Url) -> Self {
        Self {
            url,
            hls_url: Some(hls_url),
            thumbnail: None,
        }
    }

    pub fn has_adaptive(&self) -> bool {
        self.hls_url.is_some()
    }
}

/// Creator attribution shown on the item overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Author {
    pub id: AuthorId,
    pub handle: String,
    pub display_name: String,
    pub avatar_url: Option<Url>,
    pub verified: bool,
}

/// Engagement counters supplied by the content source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngagementStats {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub views: u64,
}

/// One entry of the vertical feed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedItem {
    pub id: VideoId,
    pub sources: MediaSources,
    pub author: Author,
    pub stats: EngagementStats,
    pub description: String,
    pub hashtags: Vec<String>,
    #[cfg(feature = "chrono")]
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl FeedItem {
    /// Minimal record with empty stats, description, and hashtags.
    /// Downstream code fills the rest via struct update.
    pub fn new(id: VideoId, sources: MediaSources, author: Author) -> Self {
        Self {
            id,
            sources,
            author,
            stats: EngagementStats::default(),
            description: String::new(),
            hashtags: Vec::new(),
            #[cfg(feature = "chrono")]
            published_at: None,
        }
    }

    /// Validate a content record before it enters the feed.
    ///
    /// Rejects empty author handles and hashtags with embedded whitespace;
    /// the engine assumes both invariants when building overlay callbacks.
    pub fn validate(&self) -> Result<()> {
        if self.author.handle.trim().is_empty() {
            return Err(ModelError::InvalidItem(format!(
                "item {} has an empty author handle",
                self.id
            )));
        }
        if let Some(tag) =
            self.hashtags.iter().find(|t| t.chars().any(char::is_whitespace))
        {
            return Err(ModelError::InvalidItem(format!(
                "item {} has a hashtag with whitespace: {tag:?}",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> FeedItem {
        let mut item = FeedItem::new(
            VideoId::new(),
            MediaSources::progressive(
                Url::parse("https://cdn.example.com/v/1.mp4").unwrap(),
            ),
            Author {
                id: AuthorId::new(),
                handle: "clipsmith".into(),
                display_name: "Clip Smith".into(),
                avatar_url: None,
                verified: false,
            },
        );
        item.hashtags = vec!["skate".into()];
        item
    }

    #[test]
    fn valid_item_passes() {
        assert!(item().validate().is_ok());
    }

    #[test]
    fn empty_handle_is_rejected() {
        let mut it = item();
        it.author.handle = "  ".into();
        assert!(it.validate().is_err());
    }

    #[test]
    fn hashtag_with_whitespace_is_rejected() {
        let mut it = item();
        it.hashtags.push("two words".into());
        assert!(it.validate().is_err());
    }
}
