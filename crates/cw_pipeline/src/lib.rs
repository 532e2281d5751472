use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use cw_core::{ClassifiedArticle, InferenceModel, NewsStore, Source};
use cw_inference::{Classifier, RecommendationEngine};
use cw_scrapers::{ScrapeManager, Scraper};

/// Cached batches older than this are refreshed on demand.
const STALENESS_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub scraped: usize,
    pub inserted: usize,
    pub articles: Vec<ClassifiedArticle>,
}

/// One end-to-end ingestion run: scrape all sources, classify sequentially,
/// persist with url dedup, refresh recommendations. No stage failure
/// terminates the run; everything degrades to an empty or default value.
pub struct Pipeline {
    manager: ScrapeManager,
    classifier: Classifier,
    recommendations: RecommendationEngine,
    store: Arc<dyn NewsStore>,
}

impl Pipeline {
    pub fn new(
        scraper: Arc<dyn Scraper>,
        model: Arc<dyn InferenceModel>,
        store: Arc<dyn NewsStore>,
        sources: Vec<Source>,
    ) -> Self {
        Self {
            manager: ScrapeManager::new(scraper, sources),
            classifier: Classifier::new(model.clone()),
            recommendations: RecommendationEngine::new(model),
            store,
        }
    }

    pub async fn run(&self) -> RunSummary {
        let raw = self.manager.scrape_all().await;
        let scraped = raw.len();
        info!("scraped {} articles", scraped);

        let articles = self.classifier.classify_batch(raw).await;

        let inserted = match self.store.save_articles(&articles).await {
            Ok(inserted) => inserted,
            Err(e) => {
                warn!("failed to persist batch: {}", e);
                0
            }
        };
        info!("persisted {} new articles", inserted);

        if let Err(e) = self
            .recommendations
            .update_recommendations(self.store.as_ref(), &articles)
            .await
        {
            warn!("failed to update recommendations: {}", e);
        }

        RunSummary { scraped, inserted, articles }
    }
}

/// Per-invocation refresh state, passed explicitly instead of living in
/// process-global session state. Starts empty; a batch goes stale after
/// thirty minutes.
#[derive(Default)]
pub struct RefreshContext {
    last_refresh: Option<DateTime<Utc>>,
    batch: Vec<ClassifiedArticle>,
}

impl RefreshContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now - last >= Duration::minutes(STALENESS_MINUTES),
        }
    }

    pub fn record(&mut self, batch: Vec<ClassifiedArticle>, now: DateTime<Utc>) {
        self.batch = batch;
        self.last_refresh = Some(now);
    }

    pub fn batch(&self) -> &[ClassifiedArticle] {
        &self.batch
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }
}
