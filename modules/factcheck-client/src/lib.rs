pub mod error;
pub mod types;

pub use error::{FactCheckError, Result};
pub use types::{Claim, ClaimReview, ClaimSearchQuery, ClaimSearchResponse, FactCheckSource};

use std::time::Duration;

const BASE_URL: &str = "https://factchecktools.googleapis.com/v1alpha1";

/// Per-request ceiling for a single claim lookup.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct FactCheckClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl FactCheckClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search published fact-checks for a claim. Returns every review with a URL.
    pub async fn search_claims(&self, query: &str) -> Result<Vec<FactCheckSource>> {
        let params = ClaimSearchQuery {
            query: query.to_string(),
            language_code: "en".to_string(),
            key: self.api_key.clone(),
        };

        let url = format!("{}/claims:search", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&params)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FactCheckError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let data: ClaimSearchResponse = serde_json::from_str(&body)?;
        let sources: Vec<FactCheckSource> = data
            .claims
            .into_iter()
            .flat_map(|claim| claim.into_sources(query))
            .collect();

        tracing::debug!(query, count = sources.len(), "Fact check search complete");
        Ok(sources)
    }
}
