use async_trait::async_trait;
use chrono::Duration;
use crate::types::{ClassifiedArticle, Recommendation, StoredArticle};
use crate::Result;

#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Store a batch of classified articles. An article whose url is already
    /// present is skipped; the existing record wins and is never updated.
    async fn save_articles(&self, articles: &[ClassifiedArticle]) -> Result<usize>;

    /// Articles created within the given window, newest first.
    async fn recent_articles(&self, window: Duration) -> Result<Vec<StoredArticle>>;

    /// Replace the entire recommendation set in one transaction. On failure
    /// the previously stored set is left intact.
    async fn replace_recommendations(&self, recommendations: Vec<Recommendation>) -> Result<()>;

    /// Most recent recommendations, newest first.
    async fn recent_recommendations(&self, limit: usize) -> Result<Vec<Recommendation>>;
}
