//! Deduplicated news polling.

mod cryptopanic;

pub use cryptopanic::{CryptoPanicBlockingClient, CryptoPanicClient, NewsQuery, DEFAULT_POSTS_URL};

use sentinel_core::traits::NewsSource;
use sentinel_core::types::{NewsId, NewsItem};
use tracing::{debug, info, warn};

/// Memory of the last emitted item. Lives for the process; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupState {
    last_seen_id: Option<NewsId>,
}

impl DedupState {
    pub fn last_seen_id(&self) -> Option<&NewsId> {
        self.last_seen_id.as_ref()
    }

    /// Whether `id` differs from the last emitted id.
    pub fn is_new(&self, id: &NewsId) -> bool {
        self.last_seen_id.as_ref() != Some(id)
    }

    fn record(&mut self, id: NewsId) {
        self.last_seen_id = Some(id);
    }
}

/// Polls a news source and emits only unseen items.
///
/// The dedup state is private and only reachable through `&mut self`, so a
/// single owner serializes every mutation.
pub struct NewsFeed {
    primary: Box<dyn NewsSource>,
    fallback: Option<Box<dyn NewsSource>>,
    state: DedupState,
}

impl NewsFeed {
    pub fn new(primary: impl NewsSource + 'static) -> Self {
        Self {
            primary: Box::new(primary),
            fallback: None,
            state: DedupState::default(),
        }
    }

    /// Set the transport tried once when the primary fails.
    pub fn with_fallback(mut self, fallback: impl NewsSource + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Async client first, blocking client as the fallback.
    pub fn cryptopanic(query: NewsQuery) -> Self {
        Self::new(CryptoPanicClient::new(query.clone()))
            .with_fallback(CryptoPanicBlockingClient::new(query))
    }

    pub fn state(&self) -> &DedupState {
        &self.state
    }

    /// Return the latest item if it has not been emitted before.
    ///
    /// Returns `None` when the latest item was already seen, the source has no
    /// items, or every transport failed. Never returns an error.
    pub async fn poll(&mut self) -> Option<NewsItem> {
        let items = match self.primary.latest().await {
            Ok(items) => items,
            Err(e) => {
                warn!("News source {} failed: {}", self.primary.name(), e);
                let fallback = self.fallback.as_ref()?;
                match fallback.latest().await {
                    Ok(items) => {
                        info!("News fallback succeeded via {}", fallback.name());
                        items
                    }
                    Err(e) => {
                        warn!("News fallback {} failed: {}", fallback.name(), e);
                        return None;
                    }
                }
            }
        };

        self.accept(items)
    }

    fn accept(&mut self, items: Vec<NewsItem>) -> Option<NewsItem> {
        let latest = items.into_iter().next()?;

        if !self.state.is_new(&latest.id) {
            debug!("Latest news {} already processed", latest.id);
            return None;
        }

        self.state.record(latest.id.clone());
        Some(latest)
    }
}
