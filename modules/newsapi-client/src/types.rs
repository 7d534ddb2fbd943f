use serde::{Deserialize, Serialize};

/// Query parameters for `/v2/everything`.
#[derive(Debug, Clone, Serialize)]
pub struct EverythingQuery {
    pub q: String,
    pub language: String,
    #[serde(rename = "sortBy")]
    pub sort_by: String,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    /// ISO date (YYYY-MM-DD) of the oldest article to return.
    pub from: String,
}

/// Envelope returned by every NewsAPI endpoint. `status` is `"ok"` or `"error"`.
#[derive(Debug, Clone, Deserialize)]
pub struct EverythingResponse {
    pub status: String,
    #[serde(default)]
    pub articles: Vec<Article>,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A single article from the search results.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    pub source: Option<ArticleSource>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}

impl Article {
    pub fn source_name(&self) -> &str {
        self.source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_everything_response() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": {"id": "bbc-news", "name": "BBC News"},
                    "title": "Officials confirm new planet",
                    "description": "Astronomers announced the find",
                    "url": "https://www.bbc.com/news/science-1",
                    "publishedAt": "2024-05-01T10:00:00Z"
                },
                {
                    "source": {"id": null, "name": null},
                    "title": null,
                    "url": "https://example.com/x"
                }
            ]
        }"#;
        let resp: EverythingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.articles.len(), 2);
        assert_eq!(resp.articles[0].source_name(), "BBC News");
        assert_eq!(resp.articles[1].source_name(), "");
        assert!(resp.articles[1].published_at.is_none());
    }

    #[test]
    fn parses_error_envelope() {
        let json = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid"}"#;
        let resp: EverythingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "error");
        assert!(resp.articles.is_empty());
        assert_eq!(resp.code.as_deref(), Some("apiKeyInvalid"));
    }
}
