use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use newsapi_client::{Article, NewsApiClient};
use verity_common::{extract_keywords, NewsLabel, NewsLink, NewsVerification};

use crate::traits::NewsVerifier;

const PAGE_SIZE: u32 = 10;
const MAX_KEYWORDS: usize = 5;
const VOTING_ARTICLES: usize = 5;

/// Outlets whose coverage counts towards a split verdict.
const TRUSTED_SOURCES: &[&str] = &[
    "bbc.com",
    "reuters.com",
    "apnews.com",
    "cnn.com",
    "nytimes.com",
    "theguardian.com",
    "washingtonpost.com",
    "bloomberg.com",
    "npr.org",
    "wsj.com",
    "abc.net.au",
    "aljazeera.com",
    "cbsnews.com",
    "nbcnews.com",
    "forbes.com",
    "time.com",
    "usatoday.com",
    "economist.com",
    "snopes.com",
    "politifact.com",
    "factcheck.org",
    "apnews.org",
];

const FACT_CHECKERS: &[&str] = &["snopes", "politifact", "factcheck"];

const STRONG_DEBUNK_PHRASES: &[&str] = &[
    "debunk",
    "hoax",
    "misinformation",
    "disinformation",
    "false claim",
    "fake news",
    "fabricated",
    "baseless",
    "unfounded",
    "myth",
    "not true",
    "incorrect",
    "misleading",
    "unverified claim",
    "no evidence",
];

const WEAK_DOUBT_PHRASES: &[&str] = &[
    "allegedly",
    "claims",
    "unverified",
    "rumor",
    "speculation",
    "disputed",
    "controversial",
    "questions raised",
];

const CONFIRMATION_PHRASES: &[&str] = &[
    "confirms",
    "confirmed",
    "announces",
    "announced",
    "investigation",
    "officials say",
    "breaking",
    "exclusive",
    "developing",
    "authorities",
    "verified",
    "reports confirm",
    "statement",
    "according to",
];

/// NewsAPI coverage turned into a credibility verdict by voting over the
/// top articles.
pub struct NewsApiVerifier {
    client: Option<NewsApiClient>,
}

impl NewsApiVerifier {
    pub fn new(client: Option<NewsApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NewsVerifier for NewsApiVerifier {
    async fn verify(&self, text: &str, timeout: Duration) -> Result<NewsVerification> {
        let Some(client) = &self.client else {
            return Ok(NewsVerification::unavailable());
        };

        let query = extract_keywords(text, MAX_KEYWORDS).join(" ");
        if query.is_empty() {
            debug!("No keywords to search for");
            return Ok(assess(&[], text));
        }

        let articles = client
            .search_everything(&query, PAGE_SIZE, timeout)
            .await
            .context("NewsAPI search failed")?;
        let articles: Vec<ArticleView> = articles.into_iter().map(ArticleView::from).collect();

        let verification = assess(&articles, text);
        info!(
            query = %query,
            articles = articles.len(),
            label = ?verification.label,
            confidence = verification.confidence,
            "News credibility assessed"
        );
        Ok(verification)
    }
}

/// Article fields the voting looks at, with missing values as empty strings.
#[derive(Debug, Clone, Default)]
struct ArticleView {
    title: String,
    description: String,
    url: String,
    source: String,
    published: String,
}

impl From<Article> for ArticleView {
    fn from(article: Article) -> Self {
        Self {
            source: article.source_name().to_string(),
            title: article.title.unwrap_or_default(),
            description: article.description.unwrap_or_default(),
            url: article.url.unwrap_or_default(),
            published: article.published_at.unwrap_or_default(),
        }
    }
}

impl ArticleView {
    fn is_trusted(&self) -> bool {
        let url = self.url.to_lowercase();
        TRUSTED_SOURCES.iter().any(|t| url.contains(t))
    }

    fn has_trusted_domain(&self) -> bool {
        let host = Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
            .unwrap_or_default();
        TRUSTED_SOURCES.iter().any(|t| host.contains(t))
    }

    fn is_fact_checker(&self) -> bool {
        let source = self.source.to_lowercase();
        let url = self.url.to_lowercase();
        FACT_CHECKERS
            .iter()
            .any(|site| source.contains(site) || url.contains(site))
    }
}

fn count_phrases(haystack: &str, phrases: &[&str]) -> usize {
    phrases.iter().filter(|p| haystack.contains(*p)).count()
}

/// Whether one article reports the story as real.
fn article_vote(article: &ArticleView, original_text: &str) -> NewsLabel {
    let combined = format!("{} {}", article.title, article.description).to_lowercase();

    let strong = 2 * count_phrases(&combined, STRONG_DEBUNK_PHRASES);
    let weak = count_phrases(&combined, WEAK_DOUBT_PHRASES);
    let real = count_phrases(&combined, CONFIRMATION_PHRASES);
    let fake = strong + weak;

    if article.is_fact_checker() {
        if strong > 0 {
            return NewsLabel::Fake;
        }
        if real > 0 {
            return NewsLabel::Real;
        }
    }

    if strong >= 2 || (fake > real && fake >= 2) {
        return NewsLabel::Fake;
    }
    if real > fake {
        return NewsLabel::Real;
    }

    let relevance = extract_keywords(original_text, MAX_KEYWORDS)
        .iter()
        .filter(|k| combined.contains(k.as_str()))
        .count();
    if relevance >= 3 && article.has_trusted_domain() {
        NewsLabel::Real
    } else if relevance < 2 {
        NewsLabel::Fake
    } else {
        NewsLabel::Real
    }
}

/// Consensus over the top articles.
fn assess(articles: &[ArticleView], original_text: &str) -> NewsVerification {
    if articles.is_empty() {
        return NewsVerification {
            available: true,
            label: NewsLabel::Fake,
            confidence: 0.0,
            count: 0,
            reason: "No credible sources found covering this news".to_string(),
            factors: vec!["No articles found from credible sources".to_string()],
            relevant_links: Vec::new(),
        };
    }

    let top = &articles[..articles.len().min(VOTING_ARTICLES)];
    let mut real_votes = 0;
    let mut fake_votes = 0;
    let mut factors = Vec::with_capacity(top.len() + 1);

    for article in top {
        match article_vote(article, original_text) {
            NewsLabel::Real => {
                real_votes += 1;
                factors.push(format!("✓ {}: Reports as real", article.source));
            }
            NewsLabel::Fake => {
                fake_votes += 1;
                factors.push(format!("✗ {}: Questions/debunks", article.source));
            }
        }
    }

    let total = top.len();
    let (label, confidence, reason) = if real_votes > fake_votes {
        (
            NewsLabel::Real,
            real_votes as f64 / total as f64,
            format!("Majority ({real_votes}/{total}) sources report as real"),
        )
    } else if fake_votes > real_votes {
        (
            NewsLabel::Fake,
            fake_votes as f64 / total as f64,
            format!("Majority ({fake_votes}/{total}) sources question/debunk"),
        )
    } else {
        let trusted = top.iter().filter(|a| a.is_trusted()).count();
        if trusted >= 3 {
            (
                NewsLabel::Real,
                0.6,
                format!("Split verdict but {trusted}/{VOTING_ARTICLES} from trusted sources"),
            )
        } else {
            (
                NewsLabel::Fake,
                0.5,
                "Split verdict with limited trusted sources".to_string(),
            )
        }
    };

    factors.insert(
        0,
        format!("Analyzed {total} articles: {real_votes} confirm, {fake_votes} question"),
    );

    let relevant_links: Vec<NewsLink> = top
        .iter()
        .map(|a| NewsLink {
            title: a.title.clone(),
            url: a.url.clone(),
            source: a.source.clone(),
            published: a.published.clone(),
        })
        .collect();

    NewsVerification {
        available: true,
        label,
        confidence: (confidence * 100.0).round() / 100.0,
        count: relevant_links.len(),
        reason,
        factors,
        relevant_links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(source: &str, url: &str, title: &str) -> ArticleView {
        ArticleView {
            title: title.to_string(),
            description: String::new(),
            url: url.to_string(),
            source: source.to_string(),
            published: "2026-10-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn strong_debunk_votes_fake() {
        let a = article("Daily", "https://daily.example/x", "Viral post is a hoax and misleading");
        assert_eq!(article_vote(&a, "viral post"), NewsLabel::Fake);
    }

    #[test]
    fn confirmation_votes_real() {
        let a = article("Wire", "https://wire.example/x", "Officials say the bridge reopened");
        assert_eq!(article_vote(&a, "bridge reopened"), NewsLabel::Real);
    }

    #[test]
    fn fact_checker_confirmation_wins_over_weak_doubt() {
        let a = article(
            "Snopes",
            "https://www.snopes.com/fact-check/x",
            "Claims about the rally confirmed by footage",
        );
        assert_eq!(article_vote(&a, "rally footage"), NewsLabel::Real);
    }

    #[test]
    fn neutral_article_falls_back_to_relevance() {
        let text = "Mumbai monsoon flooding closes railway stations";
        let relevant = article(
            "BBC",
            "https://www.bbc.com/news/1",
            "Mumbai monsoon flooding shuts railway lines",
        );
        assert_eq!(article_vote(&relevant, text), NewsLabel::Real);

        let unrelated = article("BBC", "https://www.bbc.com/news/2", "Cricket scores today");
        assert_eq!(article_vote(&unrelated, text), NewsLabel::Fake);
    }

    #[test]
    fn no_articles_means_no_coverage() {
        let v = assess(&[], "anything");
        assert!(v.available);
        assert_eq!(v.label, NewsLabel::Fake);
        assert_eq!(v.confidence, 0.0);
        assert_eq!(v.count, 0);
        assert_eq!(v.reason, "No credible sources found covering this news");
    }

    #[test]
    fn majority_sets_label_and_confidence() {
        let articles = vec![
            article("A", "https://a.example/1", "Officials say plan announced"),
            article("B", "https://b.example/1", "Plan confirmed in statement"),
            article("C", "https://c.example/1", "Plan is a hoax, no evidence"),
        ];
        let v = assess(&articles, "plan");
        assert_eq!(v.label, NewsLabel::Real);
        assert_eq!(v.confidence, 0.67);
        assert_eq!(v.count, 3);
        assert_eq!(v.factors[0], "Analyzed 3 articles: 2 confirm, 1 question");
    }

    #[test]
    fn tie_with_trusted_coverage_leans_real() {
        let articles = vec![
            article("BBC", "https://www.bbc.com/1", "Officials say it happened"),
            article("Reuters", "https://www.reuters.com/1", "Story confirmed"),
            article("CNN", "https://www.cnn.com/1", "Hoax and misinformation"),
            article("X", "https://x.example/1", "Fabricated and baseless"),
        ];
        let v = assess(&articles, "story");
        assert_eq!(v.label, NewsLabel::Real);
        assert_eq!(v.confidence, 0.6);
        assert_eq!(v.reason, "Split verdict but 3/5 from trusted sources");
    }

    #[test]
    fn tie_without_trusted_coverage_leans_fake() {
        let articles = vec![
            article("A", "https://a.example/1", "Officials say it happened"),
            article("B", "https://b.example/1", "Hoax and misinformation"),
        ];
        let v = assess(&articles, "story");
        assert_eq!(v.label, NewsLabel::Fake);
        assert_eq!(v.confidence, 0.5);
    }

    #[test]
    fn only_top_five_vote_and_link() {
        let articles: Vec<ArticleView> = (0..8)
            .map(|i| article("A", &format!("https://a.example/{i}"), "Officials say yes"))
            .collect();
        let v = assess(&articles, "yes");
        assert_eq!(v.count, 5);
        assert_eq!(v.relevant_links.len(), 5);
        assert_eq!(v.confidence, 1.0);
    }

    #[tokio::test]
    async fn missing_key_is_unavailable() {
        let v = NewsApiVerifier::new(None)
            .verify("anything", Duration::from_secs(1))
            .await
            .unwrap();
        assert!(!v.available);
    }
}
