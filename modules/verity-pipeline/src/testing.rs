// Test mocks for the verification dispatcher.
//
// One configurable `MockService` implements all five collaborator traits so a
// test can script each service independently:
// - succeed, optionally after a delay
// - fail with an error, optionally after a delay
// - panic
// - raise `VerityError::Unavailable` or self-report `available: false`
//
// `MockSet` bundles one mock per service and hands out `Collaborators`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use verity_common::{
    FactCheckReport, ModelPrediction, NewsLabel, NewsLink, NewsVerification, RankedSource,
    ServiceName, SocialPost, SocialSearchReport, VerityError, WebScrapeReport,
};

use crate::dispatcher::Collaborators;
use crate::traits::{FactChecker, NewsVerifier, Predictor, SocialSearcher, WebScraper};

#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    Succeed,
    SucceedAfter(Duration),
    Fail(String),
    FailAfter(Duration, String),
    Panic,
    /// Raise `VerityError::Unavailable`.
    Unavailable,
    /// Return a payload with `available: false`. Services without an
    /// availability flag raise instead.
    ReportsUnavailable,
}

impl MockBehavior {
    pub fn is_success(&self) -> bool {
        matches!(self, MockBehavior::Succeed | MockBehavior::SucceedAfter(_))
    }
}

// ---------------------------------------------------------------------------
// MockService
// ---------------------------------------------------------------------------

/// Scripted collaborator. Counts how many times it was invoked.
pub struct MockService {
    name: ServiceName,
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockService {
    pub fn new(name: ServiceName, behavior: MockBehavior) -> Self {
        Self {
            name,
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Play out the scripted behavior. `Ok(true)` means return a normal
    /// payload, `Ok(false)` a self-reported unavailable one.
    async fn act(&self, can_self_report: bool) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Succeed => Ok(true),
            MockBehavior::SucceedAfter(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(true)
            }
            MockBehavior::Fail(message) => bail!("{message}"),
            MockBehavior::FailAfter(delay, message) => {
                tokio::time::sleep(*delay).await;
                bail!("{message}")
            }
            MockBehavior::Panic => panic!("mock {} panicked", self.name),
            MockBehavior::ReportsUnavailable if can_self_report => Ok(false),
            MockBehavior::Unavailable | MockBehavior::ReportsUnavailable => {
                Err(VerityError::Unavailable(self.name.to_string()).into())
            }
        }
    }
}

pub fn sample_prediction() -> ModelPrediction {
    ModelPrediction::from_probability(0.8, "Mock model", 0.9)
}

pub fn sample_factcheck() -> FactCheckReport {
    FactCheckReport::ranked(
        "Mock fact-check analysis",
        vec![RankedSource {
            rank: 1,
            url: "https://factcheck.example/1".to_string(),
            title: "Claim reviewed".to_string(),
            publisher: "Example Checks".to_string(),
            rating: "False".to_string(),
            relevance: "medium".to_string(),
            explanation: "Fact-check source from Example Checks".to_string(),
        }],
    )
}

pub fn sample_news() -> NewsVerification {
    let links: Vec<NewsLink> = (1..=2)
        .map(|i| NewsLink {
            title: format!("Story {i}"),
            url: format!("https://news.example/{i}"),
            source: "Example News".to_string(),
            published: "2026-10-01T00:00:00Z".to_string(),
        })
        .collect();
    NewsVerification {
        available: true,
        label: NewsLabel::Real,
        confidence: 1.0,
        count: links.len(),
        reason: "Majority (2/2) sources report as real".to_string(),
        factors: vec!["Analyzed 2 articles: 2 confirm, 0 question".to_string()],
        relevant_links: links,
    }
}

pub fn sample_social(source: &str) -> SocialSearchReport {
    SocialSearchReport::found(
        source,
        vec![SocialPost {
            title: None,
            text: "Mock post".to_string(),
            url: format!("https://{source}.example/1"),
            permalink: None,
            author: "mock".to_string(),
            community: None,
            score: 10,
            engagement: 2,
            upvote_ratio: None,
        }],
        false,
    )
}

#[async_trait]
impl Predictor for MockService {
    async fn predict(&self, _text: &str) -> Result<ModelPrediction> {
        self.act(false).await?;
        Ok(sample_prediction())
    }
}

#[async_trait]
impl FactChecker for MockService {
    async fn search(&self, _text: &str, _timeout: Duration) -> Result<FactCheckReport> {
        if self.act(true).await? {
            Ok(sample_factcheck())
        } else {
            Ok(FactCheckReport::unavailable())
        }
    }
}

#[async_trait]
impl NewsVerifier for MockService {
    async fn verify(&self, _text: &str, _timeout: Duration) -> Result<NewsVerification> {
        if self.act(true).await? {
            Ok(sample_news())
        } else {
            Ok(NewsVerification::unavailable())
        }
    }
}

#[async_trait]
impl SocialSearcher for MockService {
    async fn search(
        &self,
        _text: &str,
        _label: Option<NewsLabel>,
        _limit: usize,
    ) -> Result<SocialSearchReport> {
        if self.act(true).await? {
            Ok(sample_social(self.name.as_str()))
        } else {
            Ok(SocialSearchReport::unavailable(self.name.as_str()))
        }
    }
}

#[async_trait]
impl WebScraper for MockService {
    async fn scrape(&self, _text: &str) -> Result<WebScrapeReport> {
        self.act(false).await?;
        Ok(WebScrapeReport::placeholder())
    }
}

// ---------------------------------------------------------------------------
// MockSet
// ---------------------------------------------------------------------------

/// One mock per service. Builder: `MockSet::all(..).with(name, ..)`.
pub struct MockSet {
    services: BTreeMap<ServiceName, Arc<MockService>>,
}

impl MockSet {
    pub fn all(behavior: MockBehavior) -> Self {
        let services = ServiceName::ALL
            .into_iter()
            .map(|name| (name, Arc::new(MockService::new(name, behavior.clone()))))
            .collect();
        Self { services }
    }

    pub fn with(mut self, name: ServiceName, behavior: MockBehavior) -> Self {
        self.services
            .insert(name, Arc::new(MockService::new(name, behavior)));
        self
    }

    pub fn service(&self, name: ServiceName) -> &MockService {
        &self.services[&name]
    }

    pub fn collaborators(&self) -> Collaborators {
        let get = |name: ServiceName| Arc::clone(&self.services[&name]);
        Collaborators {
            model: get(ServiceName::Model),
            factcheck: get(ServiceName::Factcheck),
            newsapi: get(ServiceName::Newsapi),
            twitter: get(ServiceName::Twitter),
            reddit: get(ServiceName::Reddit),
            webscrape: get(ServiceName::Webscrape),
        }
    }
}
