pub mod factcheck;
pub mod model;
pub mod news;
pub mod reddit;
pub mod twitter;
pub mod webscrape;

use std::sync::Arc;

use verity_common::Config;

use crate::dispatcher::Collaborators;

pub use factcheck::{ClaimExtractor, GoogleFactChecker, SentenceClaimExtractor};
pub use model::ModelPredictor;
pub use news::NewsApiVerifier;
pub use reddit::RedditSearcher;
pub use twitter::{SearchOutcome, TwitterSearcher};
pub use webscrape::PlaceholderScraper;

/// Build the production collaborators. Missing credentials or a missing model
/// file leave that collaborator in its unavailable state.
pub fn collaborators_from_config(config: &Config) -> Collaborators {
    let factcheck_client = config
        .factcheck_api_key
        .clone()
        .map(factcheck_client::FactCheckClient::new);
    let newsapi_client = config
        .news_api_key
        .clone()
        .map(newsapi_client::NewsApiClient::new);
    let twitter_client = config
        .twitter_bearer_token
        .clone()
        .map(twitter_client::TwitterClient::new);
    let tavily_client = config
        .tavily_api_key
        .clone()
        .map(tavily_client::TavilyClient::new);
    let reddit_client = match (&config.reddit_client_id, &config.reddit_client_secret) {
        (Some(id), Some(secret)) => Some(reddit_client::RedditClient::new(
            id.clone(),
            secret.clone(),
            config.reddit_user_agent.clone(),
        )),
        _ => None,
    };

    Collaborators {
        model: Arc::new(ModelPredictor::load(&config.model_path)),
        factcheck: Arc::new(GoogleFactChecker::new(factcheck_client)),
        newsapi: Arc::new(NewsApiVerifier::new(newsapi_client)),
        twitter: Arc::new(
            TwitterSearcher::new(twitter_client, tavily_client)
                .with_timeout(config.service_timeout),
        ),
        reddit: Arc::new(RedditSearcher::new(reddit_client)),
        webscrape: Arc::new(PlaceholderScraper),
    }
}
