use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
    pub error: Option<String>,
}

/// Generic Reddit listing envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Submission {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: i64,
    #[serde(default)]
    pub upvote_ratio: f64,
    pub author: Option<String>,
}

impl Submission {
    pub fn reddit_url(&self) -> String {
        format!("https://reddit.com{}", self.permalink)
    }

    /// Score weighted by upvote ratio; used to rank posts across subreddits.
    pub fn engagement(&self) -> f64 {
        self.score as f64 * self.upvote_ratio
    }
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        self.data.children.into_iter().map(|c| c.data).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_listing() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "children": [
                    {"kind": "t3", "data": {
                        "id": "abc", "title": "Planet found", "selftext": "",
                        "url": "https://news.example/planet", "permalink": "/r/news/comments/abc/planet_found/",
                        "subreddit": "news", "score": 120, "num_comments": 40,
                        "upvote_ratio": 0.9, "author": "someone"
                    }},
                    {"kind": "t3", "data": {"id": "def", "author": null}}
                ]
            }
        }"#;
        let listing: Listing<Submission> = serde_json::from_str(json).unwrap();
        let posts = listing.into_items();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].reddit_url(), "https://reddit.com/r/news/comments/abc/planet_found/");
        assert!((posts[0].engagement() - 108.0).abs() < 1e-9);
        assert_eq!(posts[1].author, None);
        assert_eq!(posts[1].score, 0);
    }
}
