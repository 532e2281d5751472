use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use cw_core::{RawArticle, Result, Source};

use crate::extract::{extract_body, extract_candidates};

/// Timeout for the initial index page fetch. Body fetches intentionally carry
/// no explicit timeout, matching the accepted limitation in the resource model.
const INDEX_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Scrape a source into zero or more raw articles. Errors abort this
    /// source only; the caller isolates them from sibling sources.
    async fn scrape(&self, source: &Source) -> Result<Vec<RawArticle>>;
}

/// Heuristic scraper that works across all registered sources using a
/// prioritized selector cascade rather than per-site markup knowledge.
pub struct SiteScraper {
    client: reqwest::Client,
}

impl SiteScraper {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_body(&self, url: &str) -> String {
        match self.fetch_page(url).await {
            Ok(html) => extract_body(&html),
            Err(e) => {
                warn!("failed to fetch article body {}: {}", url, e);
                String::new()
            }
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        Ok(response.text().await?)
    }
}

impl Default for SiteScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scraper for SiteScraper {
    async fn scrape(&self, source: &Source) -> Result<Vec<RawArticle>> {
        let response = self
            .client
            .get(&source.url)
            .timeout(INDEX_FETCH_TIMEOUT)
            .send()
            .await?;
        let html = response.text().await?;

        let candidates = extract_candidates(&html, &source.url);
        debug!("{}: {} candidate articles", source.name, candidates.len());

        let mut articles = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let summary = self.fetch_body(&candidate.url).await;
            articles.push(RawArticle {
                title: candidate.title,
                url: candidate.url,
                source: source.name.clone(),
                region: source.region.clone(),
                summary,
            });
        }

        Ok(articles)
    }
}
