//! Pagination contract with the hosting application's content source.
//!
//! The engine never fetches feed data itself; it asks the source for the
//! next page when the active index approaches the end of what is loaded.

use reelex_model::item::FeedItem;
use std::fmt::{self, Display};

/// One page of feed items plus whether more pages exist after it.
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    pub has_more: bool,
}

impl FeedPage {
    pub fn last(items: Vec<FeedItem>) -> Self {
        Self {
            items,
            has_more: false,
        }
    }
}

/// Failure loading a page. Opaque to the engine: it logs, keeps the feed
/// navigable, and will re-request on the next threshold crossing.
#[derive(Debug, Clone)]
pub struct ContentError(pub String);

impl Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content source error: {}", self.0)
    }
}

impl std::error::Error for ContentError {}

/// Paginated feed supplier owned by the hosting application.
#[cfg_attr(feature = "test-util", mockall::automock)]
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// Whether another page can be requested.
    fn has_more(&self) -> bool;

    /// Fetch the next page. `loaded` is the number of items the engine
    /// already holds, so sources can paginate without internal cursors.
    async fn load_more(
        &self,
        loaded: usize,
    ) -> Result<FeedPage, ContentError>;
}
