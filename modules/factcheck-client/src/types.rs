use serde::{Deserialize, Serialize};

/// Query parameters for `claims:search`.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimSearchQuery {
    pub query: String,
    #[serde(rename = "languageCode")]
    pub language_code: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimSearchResponse {
    #[serde(default)]
    pub claims: Vec<Claim>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// A claim and the fact-check reviews published about it.
#[derive(Debug, Clone, Deserialize)]
pub struct Claim {
    pub text: Option<String>,
    pub claimant: Option<String>,
    #[serde(rename = "claimDate")]
    pub claim_date: Option<String>,
    #[serde(rename = "claimReview", default)]
    pub claim_review: Vec<ClaimReview>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimReview {
    pub publisher: Option<Publisher>,
    pub url: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "reviewDate")]
    pub review_date: Option<String>,
    #[serde(rename = "textualRating")]
    pub textual_rating: Option<String>,
    #[serde(rename = "languageCode")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Publisher {
    pub name: Option<String>,
    pub site: Option<String>,
}

/// One review flattened together with the claim it reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct FactCheckSource {
    pub claim: String,
    pub claimant: String,
    pub url: String,
    pub title: String,
    pub publisher: String,
    pub rating: String,
    pub date: String,
}

impl Claim {
    /// Flatten every review into a source. `query` stands in for a missing
    /// claim text. Reviews without a URL are dropped.
    pub fn into_sources(self, query: &str) -> Vec<FactCheckSource> {
        let claim = self.text.unwrap_or_else(|| query.to_string());
        let claimant = self.claimant.unwrap_or_else(|| "Unknown".to_string());
        self.claim_review
            .into_iter()
            .filter_map(|review| {
                let url = review.url.filter(|u| !u.is_empty())?;
                Some(FactCheckSource {
                    claim: claim.clone(),
                    claimant: claimant.clone(),
                    url,
                    title: review.title.unwrap_or_default(),
                    publisher: review
                        .publisher
                        .and_then(|p| p.name)
                        .unwrap_or_else(|| "Unknown".to_string()),
                    rating: review.textual_rating.unwrap_or_else(|| "Unknown".to_string()),
                    date: review.review_date.unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_reviews_and_drops_missing_urls() {
        let json = r#"{
            "claims": [{
                "text": "The moon is made of cheese",
                "claimant": "Blog",
                "claimReview": [
                    {
                        "publisher": {"name": "PolitiFact", "site": "politifact.com"},
                        "url": "https://politifact.com/moon",
                        "title": "No, the moon is not cheese",
                        "reviewDate": "2024-01-02T00:00:00Z",
                        "textualRating": "False"
                    },
                    {"title": "no url here"}
                ]
            }]
        }"#;
        let resp: ClaimSearchResponse = serde_json::from_str(json).unwrap();
        let sources: Vec<_> = resp
            .claims
            .into_iter()
            .flat_map(|c| c.into_sources("moon cheese"))
            .collect();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].publisher, "PolitiFact");
        assert_eq!(sources[0].rating, "False");
        assert_eq!(sources[0].claimant, "Blog");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let json = r#"{"claims": [{"claimReview": [{"url": "https://x.org/a"}]}]}"#;
        let resp: ClaimSearchResponse = serde_json::from_str(json).unwrap();
        let sources = resp.claims[0].clone().into_sources("original query");
        assert_eq!(sources[0].claim, "original query");
        assert_eq!(sources[0].claimant, "Unknown");
        assert_eq!(sources[0].publisher, "Unknown");
        assert_eq!(sources[0].rating, "Unknown");
    }

    #[test]
    fn empty_response_has_no_claims() {
        let resp: ClaimSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.claims.is_empty());
    }
}
