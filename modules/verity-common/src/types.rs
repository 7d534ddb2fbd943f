use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Local model answers fast; anything slower than this is treated as stuck.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(2);

/// Budget for each external evidence lookup.
pub const DEFAULT_EVIDENCE_TIMEOUT: Duration = Duration::from_secs(8);

/// Default number of posts requested from each social platform.
pub const DEFAULT_SOCIAL_LIMIT: usize = 5;

// =============================================================================
// Services
// =============================================================================

/// The fixed set of verification services. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceName {
    Model,
    Factcheck,
    Newsapi,
    Twitter,
    Reddit,
    Webscrape,
}

impl ServiceName {
    pub const ALL: [ServiceName; 6] = [
        ServiceName::Model,
        ServiceName::Factcheck,
        ServiceName::Newsapi,
        ServiceName::Twitter,
        ServiceName::Reddit,
        ServiceName::Webscrape,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Model => "model",
            ServiceName::Factcheck => "factcheck",
            ServiceName::Newsapi => "newsapi",
            ServiceName::Twitter => "twitter",
            ServiceName::Reddit => "reddit",
            ServiceName::Webscrape => "webscrape",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named unit of verification work and the time it is allowed to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTask {
    pub name: ServiceName,
    pub timeout: Duration,
}

impl ServiceTask {
    pub fn new(name: ServiceName, timeout: Duration) -> Self {
        Self { name, timeout }
    }

    /// One task per service: the model gets `model_timeout`, every external
    /// evidence source gets `evidence_timeout`.
    pub fn default_set(model_timeout: Duration, evidence_timeout: Duration) -> Vec<ServiceTask> {
        ServiceName::ALL
            .iter()
            .map(|&name| {
                let timeout = match name {
                    ServiceName::Model => model_timeout,
                    _ => evidence_timeout,
                };
                ServiceTask::new(name, timeout)
            })
            .collect()
    }
}

/// Binary verdict shared by the classifier and the evidence sources.
/// Serialized as `0` (fake) / `1` (real).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum NewsLabel {
    Fake,
    Real,
}

impl From<NewsLabel> for u8 {
    fn from(label: NewsLabel) -> u8 {
        match label {
            NewsLabel::Fake => 0,
            NewsLabel::Real => 1,
        }
    }
}

impl TryFrom<u8> for NewsLabel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(NewsLabel::Fake),
            1 => Ok(NewsLabel::Real),
            other => Err(format!("invalid news label: {other}")),
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSplit {
    pub fake: f64,
    pub real: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub prediction: String,
    pub label: NewsLabel,
    /// Percentages, two decimals.
    pub confidence: ConfidenceSplit,
    pub source: String,
    pub model_accuracy: f64,
    pub count: usize,
}

impl ModelPrediction {
    /// Build a prediction from the classifier's probability that the text is real.
    pub fn from_probability(p_real: f64, source: impl Into<String>, model_accuracy: f64) -> Self {
        let p_real = p_real.clamp(0.0, 1.0);
        let label = if p_real >= 0.5 {
            NewsLabel::Real
        } else {
            NewsLabel::Fake
        };
        let prediction = match label {
            NewsLabel::Real => "Real News",
            NewsLabel::Fake => "Fake News",
        };
        Self {
            prediction: prediction.to_string(),
            label,
            confidence: ConfidenceSplit {
                fake: round2((1.0 - p_real) * 100.0),
                real: round2(p_real * 100.0),
            },
            source: source.into(),
            model_accuracy,
            count: 1,
        }
    }
}

/// One fact-check article, ranked for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSource {
    pub rank: usize,
    pub url: String,
    pub title: String,
    pub publisher: String,
    pub rating: String,
    pub relevance: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckReport {
    pub source: String,
    pub available: bool,
    pub count: usize,
    pub explanation: String,
    pub results: Vec<RankedSource>,
}

impl FactCheckReport {
    pub fn unavailable() -> Self {
        Self {
            source: "factcheck".to_string(),
            available: false,
            count: 0,
            explanation: "Fact Check API credentials not configured".to_string(),
            results: Vec::new(),
        }
    }

    pub fn empty(explanation: impl Into<String>) -> Self {
        Self {
            source: "factcheck".to_string(),
            available: true,
            count: 0,
            explanation: explanation.into(),
            results: Vec::new(),
        }
    }

    pub fn ranked(explanation: impl Into<String>, results: Vec<RankedSource>) -> Self {
        Self {
            source: "factcheck".to_string(),
            available: true,
            count: results.len(),
            explanation: explanation.into(),
            results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsLink {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsVerification {
    pub available: bool,
    pub label: NewsLabel,
    /// Share of agreeing articles, 0..1.
    pub confidence: f64,
    pub count: usize,
    pub reason: String,
    pub factors: Vec<String>,
    pub relevant_links: Vec<NewsLink>,
}

impl NewsVerification {
    pub fn unavailable() -> Self {
        Self {
            available: false,
            label: NewsLabel::Fake,
            confidence: 0.0,
            count: 0,
            reason: "NEWS_API_KEY not configured".to_string(),
            factors: Vec::new(),
            relevant_links: Vec::new(),
        }
    }
}

/// A post or article surfaced by a social search, normalized across platforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    /// Likes on X, score on Reddit.
    pub score: i64,
    /// Retweets on X, comments on Reddit.
    pub engagement: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvote_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSearchReport {
    pub source: String,
    pub available: bool,
    pub count: usize,
    /// True when results came from the web-search fallback instead of the platform.
    pub fallback: bool,
    pub results: Vec<SocialPost>,
}

impl SocialSearchReport {
    pub fn unavailable(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            available: false,
            count: 0,
            fallback: false,
            results: Vec::new(),
        }
    }

    pub fn found(source: impl Into<String>, results: Vec<SocialPost>, fallback: bool) -> Self {
        Self {
            source: source.into(),
            available: true,
            count: results.len(),
            fallback,
            results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebScrapeReport {
    pub count: usize,
    pub sources: Vec<String>,
    pub note: String,
}

impl WebScrapeReport {
    pub fn placeholder() -> Self {
        Self {
            count: 0,
            sources: Vec::new(),
            note: "Web scraping not fully implemented".to_string(),
        }
    }
}

/// Native result of a collaborator that completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServicePayload {
    Model(ModelPrediction),
    FactCheck(FactCheckReport),
    News(NewsVerification),
    Social(SocialSearchReport),
    WebScrape(WebScrapeReport),
}

impl ServicePayload {
    pub fn count(&self) -> usize {
        match self {
            ServicePayload::Model(p) => p.count,
            ServicePayload::FactCheck(r) => r.count,
            ServicePayload::News(r) => r.count,
            ServicePayload::Social(r) => r.count,
            ServicePayload::WebScrape(r) => r.count,
        }
    }

    /// False when the collaborator reported that it could not run at all
    /// (missing credentials, no model loaded).
    pub fn is_available(&self) -> bool {
        match self {
            ServicePayload::FactCheck(r) => r.available,
            ServicePayload::News(r) => r.available,
            ServicePayload::Social(r) => r.available,
            ServicePayload::Model(_) | ServicePayload::WebScrape(_) => true,
        }
    }
}

// =============================================================================
// Results
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Fault,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl ServiceFailure {
    pub fn timeout() -> Self {
        Self {
            kind: FailureKind::Timeout,
            reason: "timeout".to_string(),
        }
    }

    pub fn fault(message: impl Into<String>) -> Self {
        let message = message.into();
        let reason = if message.trim().is_empty() {
            "unknown error".to_string()
        } else {
            message
        };
        Self {
            kind: FailureKind::Fault,
            reason,
        }
    }

    pub fn unavailable(detail: impl fmt::Display) -> Self {
        Self {
            kind: FailureKind::Unavailable,
            reason: format!("unavailable: {detail}"),
        }
    }
}

/// Outcome of one service task. A `Failed` result always carries an error
/// string and a zero count.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResult {
    Completed(ServicePayload),
    Failed(ServiceFailure),
}

impl ServiceResult {
    pub fn count(&self) -> usize {
        match self {
            ServiceResult::Completed(payload) => payload.count(),
            ServiceResult::Failed(_) => 0,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ServiceResult::Completed(_) => None,
            ServiceResult::Failed(failure) => Some(&failure.reason),
        }
    }

    pub fn is_successful(&self) -> bool {
        self.error().is_none()
    }

    pub fn payload(&self) -> Option<&ServicePayload> {
        match self {
            ServiceResult::Completed(payload) => Some(payload),
            ServiceResult::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ServiceFailure> {
        match self {
            ServiceResult::Completed(_) => None,
            ServiceResult::Failed(failure) => Some(failure),
        }
    }
}

impl Serialize for ServiceResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ServiceResult::Completed(payload) => payload.serialize(serializer),
            ServiceResult::Failed(failure) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("error", &failure.reason)?;
                map.serialize_entry("count", &0usize)?;
                map.end()
            }
        }
    }
}

// =============================================================================
// Request / report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub original_text: String,
    pub summary_text: String,
}

impl VerificationRequest {
    pub fn new(original_text: impl Into<String>, summary_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            summary_text: summary_text.into(),
        }
    }
}

/// Aggregated result of one dispatcher invocation. Service entries are
/// flattened into the top-level JSON object, keyed by service name.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    #[serde(flatten)]
    pub results: BTreeMap<ServiceName, ServiceResult>,
    /// Wall-clock seconds, two decimals.
    pub execution_time: f64,
    pub services_checked: usize,
    pub services_successful: usize,
}

impl VerificationReport {
    pub fn new(
        results: BTreeMap<ServiceName, ServiceResult>,
        services_checked: usize,
        elapsed: Duration,
    ) -> Self {
        let services_successful = results.values().filter(|r| r.is_successful()).count();
        Self {
            results,
            execution_time: round2(elapsed.as_secs_f64()),
            services_checked,
            services_successful,
        }
    }

    pub fn get(&self, name: ServiceName) -> Option<&ServiceResult> {
        self.results.get(&name)
    }

    pub fn service_names(&self) -> Vec<ServiceName> {
        self.results.keys().copied().collect()
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_set_has_one_task_per_service() {
        let tasks = ServiceTask::default_set(DEFAULT_MODEL_TIMEOUT, DEFAULT_EVIDENCE_TIMEOUT);
        let names: Vec<_> = tasks.iter().map(|t| t.name).collect();
        assert_eq!(names, ServiceName::ALL.to_vec());
        assert_eq!(tasks[0].timeout, Duration::from_secs(2));
        assert!(tasks[1..].iter().all(|t| t.timeout == Duration::from_secs(8)));
    }

    #[test]
    fn failed_result_serializes_error_and_zero_count() {
        let value = serde_json::to_value(ServiceResult::Failed(ServiceFailure::timeout())).unwrap();
        assert_eq!(value, json!({ "error": "timeout", "count": 0 }));
    }

    #[test]
    fn empty_fault_message_still_reports_an_error() {
        let failure = ServiceFailure::fault("  ");
        assert_eq!(failure.reason, "unknown error");
        assert_eq!(failure.kind, FailureKind::Fault);
    }

    #[test]
    fn model_prediction_from_probability() {
        let p = ModelPrediction::from_probability(0.8731, "test", 0.96);
        assert_eq!(p.label, NewsLabel::Real);
        assert_eq!(p.prediction, "Real News");
        assert_eq!(p.confidence.real, 87.31);
        assert_eq!(p.confidence.fake, 12.69);
        assert_eq!(p.count, 1);

        let p = ModelPrediction::from_probability(0.2, "test", 0.96);
        assert_eq!(p.label, NewsLabel::Fake);
        assert_eq!(p.prediction, "Fake News");
    }

    #[test]
    fn news_label_serializes_as_integer() {
        assert_eq!(serde_json::to_value(NewsLabel::Real).unwrap(), json!(1));
        assert_eq!(serde_json::to_value(NewsLabel::Fake).unwrap(), json!(0));
        let back: NewsLabel = serde_json::from_value(json!(1)).unwrap();
        assert_eq!(back, NewsLabel::Real);
        assert!(serde_json::from_value::<NewsLabel>(json!(7)).is_err());
    }

    #[test]
    fn report_counts_successes_and_flattens_entries() {
        let mut results = BTreeMap::new();
        results.insert(
            ServiceName::Webscrape,
            ServiceResult::Completed(ServicePayload::WebScrape(WebScrapeReport::placeholder())),
        );
        results.insert(
            ServiceName::Model,
            ServiceResult::Failed(ServiceFailure::fault("model file missing")),
        );

        let report = VerificationReport::new(results, 6, Duration::from_millis(1234));
        assert_eq!(report.services_successful, 1);
        assert_eq!(report.services_checked, 6);
        assert_eq!(report.execution_time, 1.23);
        assert_eq!(
            report.service_names(),
            vec![ServiceName::Model, ServiceName::Webscrape]
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["model"], json!({ "error": "model file missing", "count": 0 }));
        assert_eq!(value["webscrape"]["count"], json!(0));
        assert_eq!(value["webscrape"]["sources"], json!([]));
        assert_eq!(value["services_successful"], json!(1));
    }

    #[test]
    fn self_reported_unavailability_is_visible_on_payload() {
        let payload = ServicePayload::Social(SocialSearchReport::unavailable("reddit"));
        assert!(!payload.is_available());
        assert_eq!(payload.count(), 0);

        let payload = ServicePayload::Social(SocialSearchReport::found("reddit", Vec::new(), false));
        assert!(payload.is_available());
    }
}
