pub mod error;
pub mod types;

pub use error::{RedditError, Result};
pub use types::{Listing, Submission, TokenResponse};

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_URL: &str = "https://oauth.reddit.com";

/// Refresh the token this long before Reddit says it expires.
const TOKEN_SLACK: Duration = Duration::from_secs(60);

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Application-only (client credentials) Reddit client. The bearer token is
/// fetched lazily and reused until shortly before it expires.
pub struct RedditClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    user_agent: String,
    auth_url: String,
    api_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    pub fn new(client_id: String, client_secret: String, user_agent: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
            client_secret,
            user_agent,
            auth_url: AUTH_URL.to_string(),
            api_url: API_URL.to_string(),
            token: Mutex::new(None),
        }
    }

    pub fn with_urls(mut self, auth_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self.api_url = api_url.into();
        self
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.token.clone());
            }
        }

        tracing::debug!("Requesting Reddit access token");
        let resp = self
            .client
            .post(&self.auth_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header("User-Agent", &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Auth(format!("status {}: {}", status.as_u16(), body)));
        }

        let body = resp.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        let access_token = match (token.access_token, token.error) {
            (Some(t), None) => t,
            (_, Some(err)) => return Err(RedditError::Auth(err)),
            (None, None) => return Err(RedditError::Auth("no access_token in response".to_string())),
        };

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_SLACK);
        *cached = Some(CachedToken {
            token: access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(access_token)
    }

    /// Search one subreddit, restricted to it, sorted by relevance over the past month.
    pub async fn search_subreddit(
        &self,
        subreddit: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Submission>> {
        let token = self.access_token().await?;

        let url = format!("{}/r/{}/search", self.api_url, subreddit);
        let limit = limit.to_string();
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header("User-Agent", &self.user_agent)
            .query(&[
                ("q", query),
                ("restrict_sr", "1"),
                ("sort", "relevance"),
                ("t", "month"),
                ("limit", limit.as_str()),
                ("raw_json", "1"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let listing: Listing<Submission> = serde_json::from_str(&body)?;
        let posts = listing.into_items();
        tracing::debug!(subreddit, count = posts.len(), "Subreddit search complete");
        Ok(posts)
    }
}
