use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use cw_core::{ClassifiedArticle, NewsStore};
use cw_geo::Geocoder;
use cw_pipeline::{Pipeline, RefreshContext};

/// Read window for every article-derived view.
pub(crate) const ARTICLE_WINDOW_HOURS: i64 = 24;

pub struct AppState {
    pub store: Arc<dyn NewsStore>,
    pub geocoder: Geocoder,
    pipeline: Option<Pipeline>,
    context: Mutex<RefreshContext>,
}

impl AppState {
    pub fn new(store: Arc<dyn NewsStore>) -> Self {
        Self {
            store,
            geocoder: Geocoder::new(),
            pipeline: None,
            context: Mutex::new(RefreshContext::new()),
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// When the cached batch is stale, run the pipeline (if one is wired in)
    /// and re-cache the 24-hour view. Requests arriving within the staleness
    /// window reuse the cached batch; the lock serializes concurrent
    /// refreshes so the pipeline runs at most once per window.
    pub async fn refresh_if_stale(&self) {
        let mut context = self.context.lock().await;
        let now = Utc::now();
        if !context.needs_refresh(now) {
            return;
        }

        if let Some(pipeline) = &self.pipeline {
            let summary = pipeline.run().await;
            info!(
                "refresh run: {} scraped, {} new",
                summary.scraped, summary.inserted
            );
        }

        let batch = match self
            .store
            .recent_articles(Duration::hours(ARTICLE_WINDOW_HOURS))
            .await
        {
            Ok(articles) => articles.into_iter().map(ClassifiedArticle::from).collect(),
            Err(e) => {
                warn!("failed to load recent articles: {}", e);
                Vec::new()
            }
        };
        context.record(batch, now);
    }

    /// The cached classified batch, refreshing first when stale.
    pub async fn current_batch(&self) -> Vec<ClassifiedArticle> {
        self.refresh_if_stale().await;
        self.context.lock().await.batch().to_vec()
    }

    #[cfg(test)]
    pub(crate) async fn backdate_refresh(&self, age: Duration) {
        let mut context = self.context.lock().await;
        let batch = context.batch().to_vec();
        context.record(batch, Utc::now() - age);
    }
}
