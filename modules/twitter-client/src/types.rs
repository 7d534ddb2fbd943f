use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentSearchResponse {
    pub data: Option<Vec<Tweet>>,
    pub includes: Option<Includes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
    pub created_at: Option<String>,
    pub public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub retweet_count: i64,
    #[serde(default)]
    pub reply_count: i64,
    #[serde(default)]
    pub quote_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub username: String,
    pub verified: Option<bool>,
}

/// A tweet joined with its author from the `includes` expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTweet {
    pub id: String,
    pub text: String,
    pub author: Option<String>,
    pub likes: i64,
    pub retweets: i64,
}

impl ResolvedTweet {
    pub fn url(&self) -> String {
        format!(
            "https://twitter.com/{}/status/{}",
            self.author.as_deref().unwrap_or("user"),
            self.id
        )
    }
}

impl RecentSearchResponse {
    /// Resolve author usernames, preserving the API's relevancy order.
    pub fn into_resolved(self) -> Vec<ResolvedTweet> {
        let users: HashMap<String, String> = self
            .includes
            .map(|i| i.users)
            .unwrap_or_default()
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        self.data
            .unwrap_or_default()
            .into_iter()
            .map(|t| {
                let metrics = t.public_metrics.unwrap_or_default();
                ResolvedTweet {
                    author: t.author_id.as_ref().and_then(|id| users.get(id).cloned()),
                    id: t.id,
                    text: t.text,
                    likes: metrics.like_count,
                    retweets: metrics.retweet_count,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_authors_from_includes() {
        let json = r#"{
            "data": [
                {"id": "1", "text": "Officials confirmed", "author_id": "u1",
                 "public_metrics": {"like_count": 10, "retweet_count": 2}},
                {"id": "2", "text": "Anonymous", "author_id": "missing"}
            ],
            "includes": {"users": [{"id": "u1", "name": "Reporter", "username": "reporter"}]},
            "meta": {"result_count": 2}
        }"#;
        let resp: RecentSearchResponse = serde_json::from_str(json).unwrap();
        let tweets = resp.into_resolved();

        assert_eq!(tweets.len(), 2);
        assert_eq!(tweets[0].author.as_deref(), Some("reporter"));
        assert_eq!(tweets[0].likes, 10);
        assert_eq!(tweets[0].url(), "https://twitter.com/reporter/status/1");
        assert_eq!(tweets[1].author, None);
        assert_eq!(tweets[1].url(), "https://twitter.com/user/status/2");
    }

    #[test]
    fn empty_search_has_no_data() {
        let resp: RecentSearchResponse =
            serde_json::from_str(r#"{"meta": {"result_count": 0}}"#).unwrap();
        assert!(resp.into_resolved().is_empty());
    }
}
