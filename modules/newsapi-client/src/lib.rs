pub mod error;
pub mod types;

pub use error::{NewsApiError, Result};
pub use types::{Article, ArticleSource, EverythingQuery, EverythingResponse};

use std::time::Duration;

use chrono::{Days, Utc};

const BASE_URL: &str = "https://newsapi.org/v2";

/// How far back `/everything` searches reach.
const LOOKBACK_DAYS: u64 = 30;

pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host (proxies, local fakes).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the query for an English relevancy-sorted search over the last 30 days.
    pub fn everything_query(query: &str, page_size: u32) -> EverythingQuery {
        let from = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(LOOKBACK_DAYS))
            .unwrap_or_else(|| Utc::now().date_naive());
        EverythingQuery {
            q: query.to_string(),
            language: "en".to_string(),
            sort_by: "relevancy".to_string(),
            page_size,
            from: from.format("%Y-%m-%d").to_string(),
        }
    }

    /// Search all articles. `timeout` bounds the whole HTTP exchange.
    pub async fn search_everything(
        &self,
        query: &str,
        page_size: u32,
        timeout: Duration,
    ) -> Result<Vec<Article>> {
        let params = Self::everything_query(query, page_size);
        tracing::debug!(query, page_size, from = %params.from, "NewsAPI search");

        let url = format!("{}/everything", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&params)
            .timeout(timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NewsApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let data: EverythingResponse = serde_json::from_str(&body)?;
        if data.status != "ok" {
            return Err(NewsApiError::Api {
                status: status.as_u16(),
                message: data.message.unwrap_or_else(|| "Unknown".to_string()),
            });
        }

        tracing::info!(query, count = data.articles.len(), "NewsAPI search complete");
        Ok(data.articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_query_uses_thirty_day_window() {
        let q = NewsApiClient::everything_query("planet discovery", 10);
        assert_eq!(q.language, "en");
        assert_eq!(q.sort_by, "relevancy");
        assert_eq!(q.page_size, 10);

        let from = chrono::NaiveDate::parse_from_str(&q.from, "%Y-%m-%d").unwrap();
        let age = Utc::now().date_naive() - from;
        // The date can roll over between building the query and checking it.
        assert!((30..=31).contains(&age.num_days()), "age {}", age.num_days());
    }
}
