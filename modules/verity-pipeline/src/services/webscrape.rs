use anyhow::Result;
use async_trait::async_trait;

use verity_common::WebScrapeReport;

use crate::traits::WebScraper;

/// Stand-in for scraping additional fact-checking sites. Always reports no sources.
pub struct PlaceholderScraper;

#[async_trait]
impl WebScraper for PlaceholderScraper {
    async fn scrape(&self, _text: &str) -> Result<WebScrapeReport> {
        Ok(WebScrapeReport::placeholder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_returns_no_sources() {
        let report = PlaceholderScraper.scrape("anything").await.unwrap();
        assert_eq!(report.count, 0);
        assert!(report.sources.is_empty());
    }
}
