use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

use cw_core::{RawArticle, Source};

use crate::site::Scraper;

/// At most this many sources are fetched concurrently.
const MAX_CONCURRENT_SOURCES: usize = 5;

pub struct ScrapeManager {
    scraper: Arc<dyn Scraper>,
    sources: Vec<Source>,
}

impl ScrapeManager {
    pub fn new(scraper: Arc<dyn Scraper>, sources: Vec<Source>) -> Self {
        Self { scraper, sources }
    }

    /// Scrape every registered source with bounded concurrency. A failing
    /// source is logged and contributes nothing; siblings always complete.
    /// Ordering across sources is unspecified; within a source, extraction
    /// order is preserved.
    pub async fn scrape_all(&self) -> Vec<RawArticle> {
        let results = stream::iter(self.sources.clone())
            .map(|source| {
                let scraper = self.scraper.clone();
                async move {
                    let result = scraper.scrape(&source).await;
                    (source, result)
                }
            })
            .buffer_unordered(MAX_CONCURRENT_SOURCES)
            .collect::<Vec<_>>()
            .await;

        let mut articles = Vec::new();
        for (source, result) in results {
            match result {
                Ok(found) => {
                    info!("{}: scraped {} articles", source.name, found.len());
                    articles.extend(found);
                }
                Err(e) => warn!("{}: scrape failed: {}", source.name, e),
            }
        }
        articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cw_core::{Error, Result};

    struct FlakyScraper;

    #[async_trait]
    impl Scraper for FlakyScraper {
        async fn scrape(&self, source: &Source) -> Result<Vec<RawArticle>> {
            if source.name.starts_with("broken") {
                return Err(Error::Scraping(format!("{} is down", source.name)));
            }
            Ok(vec![
                RawArticle {
                    title: format!("{} story 1", source.name),
                    url: format!("{}/1", source.url),
                    source: source.name.clone(),
                    region: source.region.clone(),
                    summary: String::new(),
                },
                RawArticle {
                    title: format!("{} story 2", source.name),
                    url: format!("{}/2", source.url),
                    source: source.name.clone(),
                    region: source.region.clone(),
                    summary: String::new(),
                },
            ])
        }
    }

    fn source(name: &str) -> Source {
        Source {
            name: name.to_string(),
            url: format!("https://{}.example.com", name),
            region: "Global".to_string(),
        }
    }

    #[tokio::test]
    async fn test_failing_source_does_not_affect_siblings() {
        let manager = ScrapeManager::new(
            Arc::new(FlakyScraper),
            vec![source("alpha"), source("broken-beta"), source("gamma")],
        );

        let articles = manager.scrape_all().await;
        assert_eq!(articles.len(), 4);
        assert!(articles.iter().all(|a| !a.source.starts_with("broken")));
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_empty() {
        let manager = ScrapeManager::new(
            Arc::new(FlakyScraper),
            vec![source("broken-a"), source("broken-b")],
        );
        assert!(manager.scrape_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_within_source_order_preserved() {
        let manager = ScrapeManager::new(Arc::new(FlakyScraper), vec![source("solo")]);
        let articles = manager.scrape_all().await;
        assert_eq!(articles[0].title, "solo story 1");
        assert_eq!(articles[1].title, "solo story 2");
    }
}
