use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::types::{DEFAULT_EVIDENCE_TIMEOUT, DEFAULT_MODEL_TIMEOUT, DEFAULT_SOCIAL_LIMIT};

const DEFAULT_MODEL_PATH: &str = "model/news_model.json";
const DEFAULT_REDDIT_USER_AGENT: &str = "rust:verity:v0.1 (news verification)";

/// Application configuration loaded from environment variables.
/// Every credential is optional: a missing key makes that collaborator
/// report itself unavailable instead of failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    // Evidence sources
    pub news_api_key: Option<String>,
    pub factcheck_api_key: Option<String>,
    pub twitter_bearer_token: Option<String>,
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_user_agent: String,
    pub tavily_api_key: Option<String>,

    // Model
    pub model_path: PathBuf,

    // Dispatcher
    pub model_timeout: Duration,
    pub service_timeout: Duration,
    pub social_result_limit: usize,
}

impl Config {
    /// Load `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let model_timeout = match get("MODEL_TIMEOUT_SECS") {
            Some(raw) => parse_secs("MODEL_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_MODEL_TIMEOUT,
        };
        let service_timeout = match get("SERVICE_TIMEOUT_SECS") {
            Some(raw) => parse_secs("SERVICE_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_EVIDENCE_TIMEOUT,
        };
        let social_result_limit = match get("SOCIAL_RESULT_LIMIT") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("SOCIAL_RESULT_LIMIT must be a whole number, got {raw:?}"))?,
            None => DEFAULT_SOCIAL_LIMIT,
        };

        Ok(Self {
            news_api_key: get("NEWS_API_KEY"),
            factcheck_api_key: get("GOOGLE_FACTCHECK_API_KEY"),
            twitter_bearer_token: get("TWITTER_BEARER_TOKEN"),
            reddit_client_id: get("REDDIT_CLIENT_ID"),
            reddit_client_secret: get("REDDIT_CLIENT_SECRET"),
            reddit_user_agent: get("REDDIT_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_REDDIT_USER_AGENT.to_string()),
            tavily_api_key: get("TAVILY_API_KEY"),
            model_path: get("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            model_timeout,
            service_timeout,
            social_result_limit,
        })
    }

    /// Which credentials are present, in display order.
    pub fn key_status(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("NEWS_API_KEY", self.news_api_key.is_some()),
            ("GOOGLE_FACTCHECK_API_KEY", self.factcheck_api_key.is_some()),
            ("TWITTER_BEARER_TOKEN", self.twitter_bearer_token.is_some()),
            ("REDDIT_CLIENT_ID", self.reddit_client_id.is_some()),
            ("REDDIT_CLIENT_SECRET", self.reddit_client_secret.is_some()),
            ("TAVILY_API_KEY", self.tavily_api_key.is_some()),
        ]
    }

    pub fn log_keys(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) => {
                    let n = v.char_indices().nth(5).map(|(i, _)| i).unwrap_or(v.len());
                    format!("{}...({} chars)", &v[..n], v.len())
                }
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  NEWS_API_KEY: {}", preview_opt(&self.news_api_key));
        tracing::info!("  GOOGLE_FACTCHECK_API_KEY: {}", preview_opt(&self.factcheck_api_key));
        tracing::info!("  TWITTER_BEARER_TOKEN: {}", preview_opt(&self.twitter_bearer_token));
        tracing::info!("  REDDIT_CLIENT_ID: {}", preview_opt(&self.reddit_client_id));
        tracing::info!("  REDDIT_CLIENT_SECRET: {}", preview_opt(&self.reddit_client_secret));
        tracing::info!("  TAVILY_API_KEY: {}", preview_opt(&self.tavily_api_key));
        tracing::info!("  MODEL_PATH: {}", self.model_path.display());
        tracing::info!(
            model_timeout_secs = self.model_timeout.as_secs_f64(),
            service_timeout_secs = self.service_timeout.as_secs_f64(),
            social_result_limit = self.social_result_limit,
            "  Dispatcher settings"
        );
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration> {
    let secs: f64 = raw
        .parse()
        .with_context(|| format!("{key} must be a number of seconds, got {raw:?}"))?;
    if !secs.is_finite() || secs <= 0.0 {
        anyhow::bail!("{key} must be positive, got {raw:?}");
    }
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("{key} is out of range, got {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.news_api_key.is_none());
        assert!(config.tavily_api_key.is_none());
        assert_eq!(config.model_timeout, Duration::from_secs(2));
        assert_eq!(config.service_timeout, Duration::from_secs(8));
        assert_eq!(config.social_result_limit, 5);
        assert_eq!(config.model_path, PathBuf::from("model/news_model.json"));
        assert!(config.key_status().iter().all(|(_, set)| !set));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[("NEWS_API_KEY", "   ")])).unwrap();
        assert!(config.news_api_key.is_none());
    }

    #[test]
    fn reads_keys_and_timeouts() {
        let config = Config::from_lookup(lookup(&[
            ("NEWS_API_KEY", "abc123"),
            ("MODEL_TIMEOUT_SECS", "0.5"),
            ("SERVICE_TIMEOUT_SECS", "12"),
            ("SOCIAL_RESULT_LIMIT", "3"),
        ]))
        .unwrap();
        assert_eq!(config.news_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.model_timeout, Duration::from_millis(500));
        assert_eq!(config.service_timeout, Duration::from_secs(12));
        assert_eq!(config.social_result_limit, 3);
        assert!(config.key_status().contains(&("NEWS_API_KEY", true)));
    }

    #[test]
    fn malformed_timeout_is_an_error() {
        assert!(Config::from_lookup(lookup(&[("MODEL_TIMEOUT_SECS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup(&[("SERVICE_TIMEOUT_SECS", "-1")])).is_err());
        assert!(Config::from_lookup(lookup(&[("SOCIAL_RESULT_LIMIT", "many")])).is_err());
    }

    #[test]
    fn oversized_timeout_is_an_error() {
        let err = Config::from_lookup(lookup(&[("SERVICE_TIMEOUT_SECS", "1e30")])).unwrap_err();
        assert!(err.to_string().contains("SERVICE_TIMEOUT_SECS"));
        assert!(Config::from_lookup(lookup(&[("MODEL_TIMEOUT_SECS", "1e300")])).is_err());
    }
}
