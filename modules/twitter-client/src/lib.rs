pub mod error;
pub mod types;

pub use error::{Result, TwitterError};
pub use types::{PublicMetrics, RecentSearchResponse, ResolvedTweet, Tweet, User};

use std::time::Duration;

const BASE_URL: &str = "https://api.twitter.com/2";

pub struct TwitterClient {
    client: reqwest::Client,
    bearer_token: String,
    base_url: String,
}

impl TwitterClient {
    pub fn new(bearer_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            bearer_token,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search tweets from the last seven days, sorted by relevancy.
    /// `max_results` must be between 10 and 100 per the API.
    pub async fn search_recent(
        &self,
        query: &str,
        max_results: u32,
        timeout: Duration,
    ) -> Result<Vec<ResolvedTweet>> {
        tracing::info!(query, max_results, "X recent search");

        let url = format!("{}/tweets/search/recent", self.base_url);
        let max_results = max_results.clamp(10, 100).to_string();
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("query", query),
                ("max_results", max_results.as_str()),
                ("sort_order", "relevancy"),
                ("tweet.fields", "created_at,public_metrics,author_id"),
                ("expansions", "author_id"),
                ("user.fields", "name,username,verified"),
            ])
            .timeout(timeout)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(TwitterError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TwitterError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let data: RecentSearchResponse = serde_json::from_str(&body)?;
        let tweets = data.into_resolved();
        tracing::info!(count = tweets.len(), "X recent search complete");
        Ok(tweets)
    }
}
