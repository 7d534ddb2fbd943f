// Collaborator boundaries for the verification dispatcher.
//
// Each evidence source sits behind one trait so the dispatcher can be built
// from real clients (services/) or from mocks (testing.rs) without network.
// Collaborators that cannot run at all either return a payload with
// `available: false` or fail with `VerityError::Unavailable`; the dispatcher
// treats both the same way.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use verity_common::{
    FactCheckReport, ModelPrediction, NewsLabel, NewsVerification, SocialSearchReport,
    WebScrapeReport,
};

/// Local fake-news classifier.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, text: &str) -> Result<ModelPrediction>;
}

/// Published fact-check lookup.
#[async_trait]
pub trait FactChecker: Send + Sync {
    async fn search(&self, text: &str, timeout: Duration) -> Result<FactCheckReport>;
}

/// General news search with a credibility verdict.
#[async_trait]
pub trait NewsVerifier: Send + Sync {
    async fn verify(&self, text: &str, timeout: Duration) -> Result<NewsVerification>;
}

/// Social platform search. `label` steers the query towards confirming or
/// debunking coverage; `None` searches neutrally.
#[async_trait]
pub trait SocialSearcher: Send + Sync {
    async fn search(
        &self,
        text: &str,
        label: Option<NewsLabel>,
        limit: usize,
    ) -> Result<SocialSearchReport>;
}

/// Additional web sources.
#[async_trait]
pub trait WebScraper: Send + Sync {
    async fn scrape(&self, text: &str) -> Result<WebScrapeReport>;
}
