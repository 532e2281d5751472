use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/recommendations", get(handlers::list_recommendations))
        .route("/api/trending", get(handlers::trending_threats))
        .route("/api/map", get(handlers::map_model))
        .layer(cors)
        .with_state(state)
}

pub mod prelude {
    pub use crate::AppState;
    pub use cw_core::{Error, Result, StoredArticle};
}
