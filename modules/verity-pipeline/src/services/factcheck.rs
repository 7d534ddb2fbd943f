use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use factcheck_client::{FactCheckClient, FactCheckSource};
use verity_common::{truncate_to_char_boundary, FactCheckReport, RankedSource};

use crate::traits::FactChecker;

const MAX_CLAIMS: usize = 5;
const MAX_SOURCES: usize = 5;
const MIN_CLAIM_LEN: usize = 20;
const FALLBACK_CLAIM_BYTES: usize = 200;

/// Pulls checkable statements out of free text.
pub trait ClaimExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Vec<String>;
}

/// Treats each sentence long enough to carry a fact as a claim. Falls back
/// to the head of the text when no sentence qualifies.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentenceClaimExtractor;

impl ClaimExtractor for SentenceClaimExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        let claims: Vec<String> = text
            .split(['.', '!', '?', '\n'])
            .map(str::trim)
            .filter(|s| s.chars().count() >= MIN_CLAIM_LEN)
            .take(MAX_CLAIMS)
            .map(str::to_string)
            .collect();
        if !claims.is_empty() {
            return claims;
        }

        let head = truncate_to_char_boundary(text.trim(), FALLBACK_CLAIM_BYTES);
        if head.is_empty() {
            Vec::new()
        } else {
            vec![head.to_string()]
        }
    }
}

/// Google Fact Check Tools lookup over the claims found in the text.
pub struct GoogleFactChecker {
    client: Option<FactCheckClient>,
    extractor: Box<dyn ClaimExtractor>,
}

impl GoogleFactChecker {
    pub fn new(client: Option<FactCheckClient>) -> Self {
        Self::with_extractor(client, Box::new(SentenceClaimExtractor))
    }

    pub fn with_extractor(
        client: Option<FactCheckClient>,
        extractor: Box<dyn ClaimExtractor>,
    ) -> Self {
        Self { client, extractor }
    }

    async fn lookup(&self, client: &FactCheckClient, claims: &[String]) -> FactCheckReport {
        let lookups = claims.iter().map(|claim| async move {
            match client.search_claims(claim).await {
                Ok(sources) => sources,
                Err(e) => {
                    warn!(claim = %claim, error = %e, "Fact-check lookup failed, skipping claim");
                    Vec::new()
                }
            }
        });
        let sources: Vec<FactCheckSource> =
            join_all(lookups).await.into_iter().flatten().collect();

        let sources = dedupe_by_url(sources);
        if sources.is_empty() {
            return FactCheckReport::empty("No fact-check sources found");
        }

        info!(claims = claims.len(), sources = sources.len(), "Fact-check sources found");
        FactCheckReport::ranked(
            "Analysis based on available fact-check sources",
            rank_top_sources(&sources),
        )
    }
}

#[async_trait]
impl FactChecker for GoogleFactChecker {
    async fn search(&self, text: &str, timeout: Duration) -> Result<FactCheckReport> {
        let Some(client) = &self.client else {
            return Ok(FactCheckReport::unavailable());
        };

        let claims = self.extractor.extract(text);
        debug!(claims = claims.len(), "Extracted claims");
        if claims.is_empty() {
            return Ok(FactCheckReport::empty("No verifiable claims found"));
        }

        match tokio::time::timeout(timeout, self.lookup(client, &claims)).await {
            Ok(report) => Ok(report),
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs_f64(), "Fact-check lookups timed out");
                Ok(FactCheckReport::empty("Verification timeout"))
            }
        }
    }
}

/// Keep the first source seen for each URL.
fn dedupe_by_url(sources: Vec<FactCheckSource>) -> Vec<FactCheckSource> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(s.url.clone()))
        .collect()
}

fn rank_top_sources(sources: &[FactCheckSource]) -> Vec<RankedSource> {
    sources
        .iter()
        .take(MAX_SOURCES)
        .enumerate()
        .map(|(i, src)| RankedSource {
            rank: i + 1,
            url: src.url.clone(),
            title: src.title.clone(),
            publisher: src.publisher.clone(),
            rating: src.rating.clone(),
            relevance: "medium".to_string(),
            explanation: format!("Fact-check source from {}", src.publisher),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(url: &str, publisher: &str) -> FactCheckSource {
        FactCheckSource {
            claim: "claim".to_string(),
            claimant: "Unknown".to_string(),
            url: url.to_string(),
            title: format!("Review at {url}"),
            publisher: publisher.to_string(),
            rating: "False".to_string(),
            date: String::new(),
        }
    }

    #[test]
    fn extracts_long_sentences_only() {
        let claims = SentenceClaimExtractor.extract(
            "Short one. The minister announced a new rail line yesterday! Ok? \
             Officials say the budget doubled since last year.",
        );
        assert_eq!(
            claims,
            vec![
                "The minister announced a new rail line yesterday",
                "Officials say the budget doubled since last year",
            ]
        );
    }

    #[test]
    fn extraction_caps_claims() {
        let text = "This sentence is definitely long enough. ".repeat(8);
        assert_eq!(SentenceClaimExtractor.extract(&text).len(), MAX_CLAIMS);
    }

    #[test]
    fn extraction_falls_back_to_text_head() {
        let claims = SentenceClaimExtractor.extract("Too short. Also short.");
        assert_eq!(claims, vec!["Too short. Also short."]);
        assert!(SentenceClaimExtractor.extract("   ").is_empty());
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let deduped = dedupe_by_url(vec![
            source("https://a.example/1", "A"),
            source("https://b.example/1", "B"),
            source("https://a.example/1", "C"),
        ]);
        let publishers: Vec<&str> = deduped.iter().map(|s| s.publisher.as_str()).collect();
        assert_eq!(publishers, vec!["A", "B"]);
    }

    #[test]
    fn ranks_first_five() {
        let sources: Vec<FactCheckSource> = (0..7)
            .map(|i| source(&format!("https://x.example/{i}"), &format!("P{i}")))
            .collect();
        let ranked = rank_top_sources(&sources);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[4].publisher, "P4");
        assert_eq!(ranked[2].relevance, "medium");
        assert_eq!(ranked[2].explanation, "Fact-check source from P2");
    }

    #[tokio::test]
    async fn missing_key_is_unavailable() {
        let checker = GoogleFactChecker::new(None);
        let report = checker
            .search("Some claim worth checking today.", Duration::from_secs(1))
            .await
            .unwrap();
        assert!(!report.available);
        assert_eq!(report.count, 0);
    }

    #[tokio::test]
    async fn failed_claim_lookups_are_skipped() {
        let client = FactCheckClient::new("key".to_string()).with_base_url("http://127.0.0.1:9");
        let checker = GoogleFactChecker::new(Some(client));
        let report = checker
            .search(
                "The minister announced a new rail line yesterday. Officials say the budget doubled.",
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert!(report.available);
        assert_eq!(report.count, 0);
        assert_eq!(report.explanation, "No fact-check sources found");
    }

    struct NoClaims;

    impl ClaimExtractor for NoClaims {
        fn extract(&self, _text: &str) -> Vec<String> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn no_claims_short_circuits() {
        let client = FactCheckClient::new("key".to_string()).with_base_url("http://127.0.0.1:9");
        let checker = GoogleFactChecker::with_extractor(Some(client), Box::new(NoClaims));
        let report = checker.search("text", Duration::from_secs(1)).await.unwrap();
        assert!(report.available);
        assert_eq!(report.explanation, "No verifiable claims found");
    }
}
