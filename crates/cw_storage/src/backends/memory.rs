use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use cw_core::{ClassifiedArticle, Error, NewsStore, Recommendation, Result, StoredArticle};

#[derive(Default)]
struct Inner {
    articles: Vec<StoredArticle>,
    recommendations: Vec<Recommendation>,
    next_id: i64,
}

/// In-memory store used by tests and local runs. Enforces the same
/// constraints as the SQL schema: unique urls, non-empty recommendation rows.
#[derive(Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NewsStore for MemoryStore {
    async fn save_articles(&self, articles: &[ClassifiedArticle]) -> Result<usize> {
        let mut inner = self.inner.write().await;
        let mut inserted = 0;

        for article in articles {
            if inner.articles.iter().any(|existing| existing.url == article.url) {
                continue;
            }
            inner.next_id += 1;
            let id = inner.next_id;
            inner.articles.push(StoredArticle {
                id,
                title: article.title.clone(),
                url: article.url.clone(),
                source: article.source.clone(),
                region: article.region.clone(),
                summary: article.summary.clone(),
                category: article.category.clone(),
                threat_type: article.threat_type.clone(),
                created_at: Utc::now(),
            });
            inserted += 1;
        }

        Ok(inserted)
    }

    async fn recent_articles(&self, window: Duration) -> Result<Vec<StoredArticle>> {
        let cutoff = Utc::now() - window;
        let inner = self.inner.read().await;

        let mut articles: Vec<StoredArticle> = inner
            .articles
            .iter()
            .filter(|a| a.created_at >= cutoff)
            .cloned()
            .collect();
        articles.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(articles)
    }

    async fn replace_recommendations(&self, recommendations: Vec<Recommendation>) -> Result<()> {
        // Validate the whole batch before touching stored state, so a bad row
        // mid-batch leaves the previous set intact.
        for recommendation in &recommendations {
            if recommendation.threat_type.is_empty() || recommendation.recommendation.is_empty() {
                return Err(Error::Storage(
                    "recommendation row violates not-null constraint".to_string(),
                ));
            }
        }

        let mut inner = self.inner.write().await;
        inner.recommendations = recommendations;
        Ok(())
    }

    async fn recent_recommendations(&self, limit: usize) -> Result<Vec<Recommendation>> {
        let inner = self.inner.read().await;
        // Ties on created_at break by reverse insertion order, matching the
        // SQLite backend's `created_at DESC, id DESC`.
        let mut indexed: Vec<(usize, &Recommendation)> =
            inner.recommendations.iter().enumerate().collect();
        indexed.sort_by(|a, b| (b.1.created_at, b.0).cmp(&(a.1.created_at, a.0)));
        Ok(indexed
            .into_iter()
            .take(limit)
            .map(|(_, recommendation)| recommendation.clone())
            .collect())
    }
}
