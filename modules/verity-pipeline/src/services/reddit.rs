use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

use reddit_client::{RedditClient, Submission};
use verity_common::{
    extract_search_terms, truncate_to_char_boundary, NewsLabel, SocialPost, SocialSearchReport,
};

use crate::traits::SocialSearcher;

const SOURCE: &str = "reddit";
const MAX_TERMS: usize = 5;
const MAX_SELFTEXT_BYTES: usize = 500;

const REAL_SUBREDDITS: &[&str] = &["news", "worldnews", "politics", "technology", "business"];
const FAKE_SUBREDDITS: &[&str] = &["fakenews", "skeptic", "OutOfTheLoop"];
const NEUTRAL_SUBREDDITS: &[&str] = &["news", "worldnews", "politics"];

/// Searches a label-dependent set of subreddits and keeps the most engaged posts.
pub struct RedditSearcher {
    client: Option<RedditClient>,
}

impl RedditSearcher {
    pub fn new(client: Option<RedditClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SocialSearcher for RedditSearcher {
    async fn search(
        &self,
        text: &str,
        label: Option<NewsLabel>,
        limit: usize,
    ) -> Result<SocialSearchReport> {
        let Some(client) = &self.client else {
            return Ok(SocialSearchReport::unavailable(SOURCE));
        };

        let query = extract_search_terms(text, MAX_TERMS).join(" ");
        if query.is_empty() {
            return Ok(SocialSearchReport::found(SOURCE, Vec::new(), false));
        }

        let subreddits = subreddits_for(label);
        let per_subreddit = posts_per_subreddit(limit, subreddits.len());

        let lookups = subreddits.iter().map(|sub| {
            let query = query.as_str();
            async move { (*sub, client.search_subreddit(sub, query, per_subreddit).await) }
        });

        let submissions = gather(join_all(lookups).await)?;

        let posts = top_posts(submissions, limit);
        info!(query = %query, count = posts.len(), "Reddit search complete");
        Ok(SocialSearchReport::found(SOURCE, posts, false))
    }
}

/// Merge per-subreddit results, skipping failed subreddits. Fails only when
/// every subreddit failed.
fn gather<E: std::fmt::Display>(
    outcomes: Vec<(&str, std::result::Result<Vec<Submission>, E>)>,
) -> Result<Vec<Submission>> {
    let searched = outcomes.len();
    let mut submissions = Vec::new();
    let mut failures = 0;
    for (sub, outcome) in outcomes {
        match outcome {
            Ok(found) => submissions.extend(found),
            Err(e) => {
                warn!(subreddit = sub, error = %e, "Subreddit search failed, skipping");
                failures += 1;
            }
        }
    }
    if searched > 0 && failures == searched {
        return Err(anyhow!("all {failures} subreddit searches failed"));
    }
    Ok(submissions)
}

fn subreddits_for(label: Option<NewsLabel>) -> &'static [&'static str] {
    match label {
        Some(NewsLabel::Real) => REAL_SUBREDDITS,
        Some(NewsLabel::Fake) => FAKE_SUBREDDITS,
        None => NEUTRAL_SUBREDDITS,
    }
}

fn posts_per_subreddit(limit: usize, subreddits: usize) -> u32 {
    (limit / subreddits.max(1) + 1).max(1) as u32
}

/// Highest `score × upvote_ratio` first, capped at `limit`.
fn top_posts(mut submissions: Vec<Submission>, limit: usize) -> Vec<SocialPost> {
    submissions.sort_by(|a, b| b.engagement().total_cmp(&a.engagement()));
    submissions
        .into_iter()
        .take(limit)
        .map(submission_post)
        .collect()
}

fn submission_post(s: Submission) -> SocialPost {
    SocialPost {
        permalink: Some(s.reddit_url()),
        text: truncate_to_char_boundary(&s.selftext, MAX_SELFTEXT_BYTES).to_string(),
        author: s.author.unwrap_or_else(|| "[deleted]".to_string()),
        title: Some(s.title),
        url: s.url,
        community: Some(s.subreddit),
        score: s.score,
        engagement: s.num_comments,
        upvote_ratio: Some(s.upvote_ratio),
    }
}
