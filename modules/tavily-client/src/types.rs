use serde::{Deserialize, Serialize};

/// Request body for `POST /search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub api_key: String,
    pub query: String,
    pub search_depth: String,
    pub max_results: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub score: Option<f64>,
}

/// Options for a search. `Default` is a basic search with five results.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub advanced: bool,
    pub max_results: u32,
    pub include_domains: Vec<String>,
    pub days: Option<u32>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            advanced: false,
            max_results: 5,
            include_domains: Vec::new(),
            days: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_empty_filters() {
        let req = SearchRequest {
            api_key: "k".to_string(),
            query: "q".to_string(),
            search_depth: "basic".to_string(),
            max_results: 5,
            include_domains: Vec::new(),
            days: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("include_domains").is_none());
        assert!(value.get("days").is_none());
    }

    #[test]
    fn parses_results_with_missing_fields() {
        let json = r#"{"results": [{"url": "https://ndtv.com/a.html", "content": "body"}, {}]}"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.results.len(), 2);
        assert_eq!(resp.results[0].title, "");
        assert_eq!(resp.results[1].url, "");
    }
}
