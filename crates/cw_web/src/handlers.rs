use axum::{extract::State, Json};
use chrono::Duration;
use std::sync::Arc;
use tracing::warn;

use cw_core::{Recommendation, StoredArticle, TrendingThreat};
use cw_geo::RegionThreatAggregate;

use crate::state::ARTICLE_WINDOW_HOURS;
use crate::AppState;

const RECOMMENDATION_LIMIT: usize = 3;
const TRENDING_LIMIT: usize = 3;

// Store failures surface as empty collections, never as raw errors.

/// Articles created within the last 24 hours, newest first.
pub async fn list_articles(State(state): State<Arc<AppState>>) -> Json<Vec<StoredArticle>> {
    state.refresh_if_stale().await;
    let articles = match state
        .store
        .recent_articles(Duration::hours(ARTICLE_WINDOW_HOURS))
        .await
    {
        Ok(articles) => articles,
        Err(e) => {
            warn!("failed to load recent articles: {}", e);
            Vec::new()
        }
    };
    Json(articles)
}

/// The three most recent recommendations, newest first.
pub async fn list_recommendations(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<Recommendation>> {
    state.refresh_if_stale().await;
    let recommendations = match state.store.recent_recommendations(RECOMMENDATION_LIMIT).await {
        Ok(recommendations) => recommendations,
        Err(e) => {
            warn!("failed to load recommendations: {}", e);
            Vec::new()
        }
    };
    Json(recommendations)
}

/// Top threat types by frequency over the cached 24-hour batch.
pub async fn trending_threats(State(state): State<Arc<AppState>>) -> Json<Vec<TrendingThreat>> {
    let batch = state.current_batch().await;
    Json(cw_inference::trending_threats(&batch, TRENDING_LIMIT))
}

/// Region-aggregated threat model for map rendering.
pub async fn map_model(State(state): State<Arc<AppState>>) -> Json<Vec<RegionThreatAggregate>> {
    let batch = state.current_batch().await;
    Json(cw_geo::build_map_model(&state.geocoder, &batch).await)
}
