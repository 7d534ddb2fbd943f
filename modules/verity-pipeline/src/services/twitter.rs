use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use tavily_client::{SearchOptions, SearchResult, TavilyClient};
use twitter_client::{ResolvedTweet, TwitterClient, TwitterError};
use verity_common::{
    truncate_to_char_boundary, NewsLabel, SocialPost, SocialSearchReport, DEFAULT_EVIDENCE_TIMEOUT,
};

use crate::traits::SocialSearcher;

const SOURCE: &str = "twitter";
/// Requested from the API; the API rejects anything below 10.
const REQUESTED_TWEETS: u32 = 20;
const MAX_QUERY_BYTES: usize = 200;
const MAX_POST_BYTES: usize = 280;
const MIN_ARTICLE_CONTENT: usize = 50;
const FALLBACK_RESULTS: u32 = 10;
const FALLBACK_DAYS: u32 = 365;

/// News outlets searched when X cannot answer.
const FALLBACK_NEWS_DOMAINS: &[&str] = &[
    "timesofindia.indiatimes.com",
    "thehindu.com",
    "hindustantimes.com",
    "indianexpress.com",
    "ndtv.com",
    "thequint.com",
    "thewire.in",
    "scroll.in",
    "news18.com",
    "zeenews.india.com",
    "dnaindia.com",
    "deccanherald.com",
    "firstpost.com",
    "livemint.com",
];

const NON_ARTICLE_PATHS: &[&str] = &[
    "/topic/",
    "/tag/",
    "/search/",
    "/category/",
    "/author/",
    "/latest/",
    "/trending/",
    "/videos/",
    "/photogallery/",
];

const ARTICLE_MARKERS: &[&str] = &[
    ".html",
    ".htm",
    "/articleshow/",
    "/story/",
    "/article/",
    "/news/",
    ".cms",
    ".ece",
];

/// What the primary X search produced. Anything but `Results` sends the
/// search to the web fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Unavailable,
    RateLimited,
    NoResults,
    Results(Vec<SocialPost>),
}

/// What to do after the primary search.
#[derive(Debug, Clone, PartialEq)]
enum NextStep {
    Report(SocialSearchReport),
    Fallback,
}

/// Map a primary outcome to a final report, or to a fallback search when one
/// is configured.
fn next_step(outcome: SearchOutcome, fallback_configured: bool) -> NextStep {
    match outcome {
        SearchOutcome::Results(posts) => {
            NextStep::Report(SocialSearchReport::found(SOURCE, posts, false))
        }
        _ if fallback_configured => NextStep::Fallback,
        SearchOutcome::Unavailable => NextStep::Report(SocialSearchReport::unavailable(SOURCE)),
        SearchOutcome::RateLimited | SearchOutcome::NoResults => {
            NextStep::Report(SocialSearchReport::found(SOURCE, Vec::new(), false))
        }
    }
}

/// X recent search with a news-site web search behind it.
pub struct TwitterSearcher {
    client: Option<TwitterClient>,
    fallback: Option<TavilyClient>,
    timeout: Duration,
}

impl TwitterSearcher {
    pub fn new(client: Option<TwitterClient>, fallback: Option<TavilyClient>) -> Self {
        Self {
            client,
            fallback,
            timeout: DEFAULT_EVIDENCE_TIMEOUT,
        }
    }

    /// Bound on the X request itself.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn search_platform(
        &self,
        text: &str,
        label: Option<NewsLabel>,
        limit: usize,
    ) -> Result<SearchOutcome> {
        let Some(client) = &self.client else {
            return Ok(SearchOutcome::Unavailable);
        };

        let query = tweet_query(text, label);
        match client
            .search_recent(&query, REQUESTED_TWEETS, self.timeout)
            .await
        {
            Ok(tweets) if tweets.is_empty() => Ok(SearchOutcome::NoResults),
            Ok(tweets) => Ok(SearchOutcome::Results(
                tweets.into_iter().take(limit).map(tweet_post).collect(),
            )),
            Err(TwitterError::RateLimited) => {
                warn!("X search rate limited");
                Ok(SearchOutcome::RateLimited)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn search_fallback(
        &self,
        client: &TavilyClient,
        text: &str,
        label: Option<NewsLabel>,
        limit: usize,
    ) -> Result<Vec<SocialPost>> {
        let options = SearchOptions {
            advanced: true,
            max_results: FALLBACK_RESULTS,
            include_domains: FALLBACK_NEWS_DOMAINS.iter().map(|d| d.to_string()).collect(),
            days: Some(FALLBACK_DAYS),
        };
        let results = client.search(&web_query(text, label), &options).await?;
        Ok(articles_as_posts(results, limit))
    }
}

#[async_trait]
impl SocialSearcher for TwitterSearcher {
    async fn search(
        &self,
        text: &str,
        label: Option<NewsLabel>,
        limit: usize,
    ) -> Result<SocialSearchReport> {
        let outcome = self.search_platform(text, label, limit).await?;
        debug!(outcome = ?outcome, "X search finished");

        match (next_step(outcome, self.fallback.is_some()), &self.fallback) {
            (NextStep::Fallback, Some(fallback)) => {
                let posts = self.search_fallback(fallback, text, label, limit).await?;
                info!(count = posts.len(), "Web fallback search complete");
                Ok(SocialSearchReport::found(SOURCE, posts, true))
            }
            (NextStep::Report(report), _) => {
                info!(count = report.count, available = report.available, "X search complete");
                Ok(report)
            }
            (NextStep::Fallback, None) => Ok(SocialSearchReport::unavailable(SOURCE)),
        }
    }
}

fn tweet_query(text: &str, label: Option<NewsLabel>) -> String {
    let cleaned = text.replace('"', "");
    let q = truncate_to_char_boundary(cleaned.trim(), MAX_QUERY_BYTES);
    match label {
        Some(NewsLabel::Real) => {
            format!("\"{q}\" (verified OR confirmed OR official) -is:retweet lang:en")
        }
        Some(NewsLabel::Fake) => format!("\"{q}\" (debunked OR false OR fake) -is:retweet lang:en"),
        None => format!("\"{q}\" -is:retweet lang:en"),
    }
}

fn web_query(text: &str, label: Option<NewsLabel>) -> String {
    match label {
        Some(NewsLabel::Real) => format!("{text} verified confirmed official"),
        Some(NewsLabel::Fake) => format!("{text} debunked false fake"),
        None => text.to_string(),
    }
}

fn tweet_post(tweet: ResolvedTweet) -> SocialPost {
    SocialPost {
        title: None,
        url: tweet.url(),
        author: tweet.author.clone().unwrap_or_else(|| "Unknown".to_string()),
        text: tweet.text,
        permalink: None,
        community: None,
        score: tweet.likes,
        engagement: tweet.retweets,
        upvote_ratio: None,
    }
}

/// Article pages only, never topic listings or search pages.
fn is_valid_article_url(url: &str) -> bool {
    let url = url.to_lowercase();
    if NON_ARTICLE_PATHS.iter().any(|p| url.contains(p)) {
        return false;
    }
    ARTICLE_MARKERS.iter().any(|m| url.contains(m))
}

fn articles_as_posts(results: Vec<SearchResult>, limit: usize) -> Vec<SocialPost> {
    results
        .into_iter()
        .filter(|r| !r.url.is_empty() && is_valid_article_url(&r.url))
        .filter_map(|r| {
            let content = if r.content.trim().is_empty() { &r.title } else { &r.content };
            if content.trim().chars().count() < MIN_ARTICLE_CONTENT {
                return None;
            }
            let author = Url::parse(&r.url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_else(|| "Web Source".to_string());
            Some(SocialPost {
                title: (!r.title.is_empty()).then(|| r.title.clone()),
                text: truncate_to_char_boundary(content, MAX_POST_BYTES).to_string(),
                url: r.url.clone(),
                author,
                permalink: None,
                community: None,
                score: 0,
                engagement: 0,
                upvote_ratio: None,
            })
        })
        .take(limit)
        .collect()
}
