//! Placeholder content endpoint.

use super::{RemoteError, RemoteSource, SERVER_CATEGORY};
use async_trait::async_trait;
use quotesync_engine::QuoteRecord;
use serde::Deserialize;
use std::time::Duration;

/// Endpoint used when none is configured.
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Number of posts taken from each response by default.
pub const DEFAULT_REMOTE_LIMIT: usize = 5;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A post as returned by the placeholder endpoint. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
}

/// Remote source backed by an HTTP endpoint returning posts.
///
/// The first `limit` posts become quotes `{text: title, category: "Server"}`.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    url: String,
    limit: usize,
}

impl HttpRemote {
    /// Create a remote for the given endpoint.
    pub fn new(url: impl Into<String>, limit: usize) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            limit,
        })
    }

    /// The endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Map posts to quotes, skipping untitled ones.
fn posts_to_quotes(posts: Vec<Post>, limit: usize) -> Vec<QuoteRecord> {
    posts
        .into_iter()
        .take(limit)
        .filter_map(|post| QuoteRecord::new(&post.title, SERVER_CATEGORY).ok())
        .collect()
}

#[async_trait]
impl RemoteSource for HttpRemote {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self) -> Result<Vec<QuoteRecord>, RemoteError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let posts: Vec<Post> = response.json().await?;
        tracing::debug!(url = %self.url, posts = posts.len(), "Fetched remote posts");

        Ok(posts_to_quotes(posts, self.limit))
    }

    async fn store(&self, quotes: &[QuoteRecord]) -> Result<(), RemoteError> {
        let response = self.client.post(&self.url).json(quotes).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        tracing::debug!(url = %self.url, quotes = quotes.len(), "Pushed quotes to remote");
        Ok(())
    }
}
