//! News source trait definition.

use crate::error::FeedError;
use crate::types::NewsItem;
use async_trait::async_trait;

/// A transport that returns the current headline list.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch headlines, most recent first.
    async fn latest(&self) -> Result<Vec<NewsItem>, FeedError>;

    /// Get the source name.
    fn name(&self) -> &str;
}
