pub mod error;
pub mod types;

pub use error::{Result, TavilyError};
pub use types::{SearchOptions, SearchRequest, SearchResponse, SearchResult};

const BASE_URL: &str = "https://api.tavily.com";

pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
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

    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        tracing::info!(query, max_results = options.max_results, "Tavily search");

        let request = SearchRequest {
            api_key: self.api_key.clone(),
            query: query.to_string(),
            search_depth: if options.advanced { "advanced" } else { "basic" }.to_string(),
            max_results: options.max_results,
            include_domains: options.include_domains.clone(),
            days: options.days,
        };

        let url = format!("{}/search", self.base_url);
        let resp = self.client.post(&url).json(&request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TavilyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let data: SearchResponse = serde_json::from_str(&body)?;
        tracing::info!(query, count = data.results.len(), "Tavily search complete");
        Ok(data.results)
    }
}
