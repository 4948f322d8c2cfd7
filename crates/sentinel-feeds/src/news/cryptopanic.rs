//! CryptoPanic posts API transports.

use crate::http::{get_json, get_json_blocking, run_blocking};
use async_trait::async_trait;
use reqwest::Client;
use sentinel_core::error::FeedError;
use sentinel_core::traits::NewsSource;
use sentinel_core::types::{NewsId, NewsItem};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_POSTS_URL: &str = "https://cryptopanic.com/api/v1/posts/";

/// Fixed filter sent with every posts request.
#[derive(Clone)]
pub struct NewsQuery {
    pub url: String,
    pub auth_token: String,
    pub currencies: String,
    pub filter: String,
    pub kind: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for NewsQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsQuery")
            .field("url", &self.url)
            .field("auth_token", &"<redacted>")
            .field("currencies", &self.currencies)
            .field("filter", &self.filter)
            .field("kind", &self.kind)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl NewsQuery {
    /// Important news for one currency, the filter the loop polls with by default.
    pub fn important(auth_token: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_POSTS_URL.to_string(),
            auth_token: auth_token.into(),
            currencies: currency.into(),
            filter: "important".to_string(),
            kind: "news".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("auth_token", self.auth_token.clone()),
            ("currencies", self.currencies.clone()),
            ("filter", self.filter.clone()),
            ("kind", self.kind.clone()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct PostsResponse {
    results: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    id: NewsId,
    title: String,
}

impl From<PostsResponse> for Vec<NewsItem> {
    fn from(resp: PostsResponse) -> Self {
        resp.results
            .into_iter()
            .map(|p| NewsItem {
                id: p.id,
                headline: p.title,
            })
            .collect()
    }
}

/// Primary news transport on the shared async client.
pub struct CryptoPanicClient {
    client: Client,
    query: NewsQuery,
}

impl CryptoPanicClient {
    pub fn new(query: NewsQuery) -> Self {
        Self {
            client: Client::new(),
            query,
        }
    }
}

#[async_trait]
impl NewsSource for CryptoPanicClient {
    async fn latest(&self) -> Result<Vec<NewsItem>, FeedError> {
        let request = self.client.get(&self.query.url).query(&self.query.params());
        let resp: PostsResponse = get_json(request, self.query.timeout).await?;
        Ok(resp.into())
    }

    fn name(&self) -> &str {
        "cryptopanic"
    }
}

/// Fallback news transport: a blocking client run on a blocking worker.
pub struct CryptoPanicBlockingClient {
    query: NewsQuery,
}

impl CryptoPanicBlockingClient {
    pub fn new(query: NewsQuery) -> Self {
        Self { query }
    }
}

#[async_trait]
impl NewsSource for CryptoPanicBlockingClient {
    async fn latest(&self) -> Result<Vec<NewsItem>, FeedError> {
        let url = self.query.url.clone();
        let params = self.query.params();
        let timeout = self.query.timeout;

        let resp: PostsResponse = run_blocking(move || get_json_blocking(&url, &params, timeout)).await?;
        Ok(resp.into())
    }

    fn name(&self) -> &str {
        "cryptopanic-blocking"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::decode;
    use crate::news::NewsFeed;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Serves a canned body through the same decode path as the HTTP clients.
    #[derive(Clone)]
    struct CannedBody {
        body: &'static str,
        calls: Arc<AtomicU32>,
    }

    impl CannedBody {
        fn new(body: &'static str) -> Self {
            Self {
                body,
                calls: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    #[async_trait]
    impl NewsSource for CannedBody {
        async fn latest(&self) -> Result<Vec<NewsItem>, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let resp: PostsResponse = decode(self.body)?;
            Ok(resp.into())
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    #[test]
    fn test_parse_posts() {
        let body = r#"{
            "count": 2,
            "next": null,
            "results": [
                {"kind": "news", "id": 42, "title": "Bitcoin ETF denied by SEC", "domain": "x.com"},
                {"kind": "news", "id": 41, "title": "Older headline"}
            ]
        }"#;
        let resp: PostsResponse = serde_json::from_str(body).unwrap();
        let items: Vec<NewsItem> = resp.into();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, NewsId::from("42"));
        assert_eq!(items[0].headline, "Bitcoin ETF denied by SEC");
    }

    #[test]
    fn test_empty_results_is_empty() {
        let resp: PostsResponse = serde_json::from_str(r#"{"count": 0, "results": []}"#).unwrap();
        let items: Vec<NewsItem> = resp.into();
        assert!(items.is_empty());
    }

    #[test]
    fn test_error_body_without_results_is_malformed() {
        let body = r#"{"status": "Incomplete", "info": "Token not found"}"#;
        let err = decode::<PostsResponse>(body).unwrap_err();
        assert!(matches!(err, FeedError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_error_body_falls_back_once() {
        let primary = CannedBody::new(r#"{"status": "Incomplete", "info": "Token not found"}"#);
        let fallback =
            CannedBody::new(r#"{"results": [{"id": 42, "title": "Bitcoin ETF denied by SEC"}]}"#);
        let mut feed = NewsFeed::new(primary.clone()).with_fallback(fallback.clone());

        let item = feed.poll().await.unwrap();
        assert_eq!(item.id.as_str(), "42");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_post_without_title_is_malformed() {
        assert!(serde_json::from_str::<PostsResponse>(r#"{"results": [{"id": 1}]}"#).is_err());
    }

    #[test]
    fn test_query_params_and_redaction() {
        let query = NewsQuery::important("secret-token", "BTC");
        let params = query.params();
        assert!(params.contains(&("auth_token", "secret-token".to_string())));
        assert!(params.contains(&("currencies", "BTC".to_string())));
        assert!(params.contains(&("filter", "important".to_string())));
        assert!(params.contains(&("kind", "news".to_string())));
        assert!(!format!("{:?}", query).contains("secret-token"));
    }
}
