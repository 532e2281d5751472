use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use cw_core::{ClassifiedArticle, InferenceModel, NewsStore, Recommendation, Result, TrendingThreat};

/// How many trending threat types get recommendations.
const TOP_THREATS: usize = 3;

/// Most frequent threat types in a batch, ties broken by first-encounter
/// order. Empty threat types are skipped.
pub fn trending_threats(articles: &[ClassifiedArticle], limit: usize) -> Vec<TrendingThreat> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for article in articles {
        let threat = article.threat_type.as_str();
        if threat.is_empty() {
            continue;
        }
        let count = counts.entry(threat).or_insert(0);
        if *count == 0 {
            order.push(threat);
        }
        *count += 1;
    }

    let mut trending: Vec<TrendingThreat> = order
        .into_iter()
        .map(|threat| TrendingThreat {
            threat_type: threat.to_string(),
            count: counts[threat],
        })
        .collect();

    // Stable sort keeps first-encounter order among equal counts.
    trending.sort_by(|a, b| b.count.cmp(&a.count));
    trending.truncate(limit);
    trending
}

/// Static advisory used when the inference call fails.
pub fn fallback_recommendation(threat_type: &str) -> String {
    format!(
        "Standard protection measures against {}:\n\
         - Use strong passwords\n\
         - Enable two-factor authentication\n\
         - Keep systems updated\n\
         - Use antivirus software",
        threat_type
    )
}

pub struct RecommendationEngine {
    model: Arc<dyn InferenceModel>,
}

impl RecommendationEngine {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self { model }
    }

    /// Replace the stored recommendation set based on the batch's trending
    /// threats. An empty batch (or one with no threat types) leaves the
    /// existing set untouched. A store failure aborts the replacement and
    /// the prior set survives.
    pub async fn update_recommendations(
        &self,
        store: &dyn NewsStore,
        articles: &[ClassifiedArticle],
    ) -> Result<()> {
        let top = trending_threats(articles, TOP_THREATS);
        if top.is_empty() {
            return Ok(());
        }

        let mut recommendations = Vec::with_capacity(top.len());
        for threat in &top {
            let text = match self.model.recommend(&threat.threat_type).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("recommendation failed for {}: {}", threat.threat_type, e);
                    fallback_recommendation(&threat.threat_type)
                }
            };
            recommendations.push(Recommendation {
                threat_type: threat.threat_type.clone(),
                recommendation: text,
                created_at: Utc::now(),
            });
        }

        store.replace_recommendations(recommendations).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use cw_core::{Classification, Error, StoredArticle};
    use tokio::sync::Mutex;

    fn article(threat_type: &str) -> ClassifiedArticle {
        ClassifiedArticle {
            title: "t".to_string(),
            url: format!("https://t/{}", threat_type),
            source: "s".to_string(),
            region: "Global".to_string(),
            summary: String::new(),
            category: "Industry News".to_string(),
            threat_type: threat_type.to_string(),
        }
    }

    #[test]
    fn test_trending_threats_counts_and_orders() {
        let batch = vec![
            article("Phishing"),
            article("Ransomware"),
            article("Phishing"),
        ];
        let trending = trending_threats(&batch, 3);
        assert_eq!(
            trending,
            vec![
                TrendingThreat { threat_type: "Phishing".to_string(), count: 2 },
                TrendingThreat { threat_type: "Ransomware".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_trending_threats_tie_break_is_first_encountered() {
        let batch = vec![article("DDoS"), article("Phishing"), article("DDoS"), article("Phishing")];
        let trending = trending_threats(&batch, 2);
        assert_eq!(trending[0].threat_type, "DDoS");
        assert_eq!(trending[1].threat_type, "Phishing");
    }

    #[test]
    fn test_trending_threats_skips_empty() {
        let batch = vec![article(""), article("")];
        assert!(trending_threats(&batch, 3).is_empty());
    }

    #[test]
    fn test_fallback_recommendation_names_threat() {
        let text = fallback_recommendation("Phishing");
        assert!(text.contains("Phishing"));
        assert_eq!(text.lines().filter(|l| l.starts_with('-')).count(), 4);
    }

    struct FailingModel;

    #[async_trait]
    impl InferenceModel for FailingModel {
        async fn classify(&self, _: &str, _: &str) -> cw_core::Result<Classification> {
            Err(Error::Inference("down".to_string()))
        }

        async fn recommend(&self, _: &str) -> cw_core::Result<String> {
            Err(Error::Inference("down".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        recommendations: Mutex<Vec<Recommendation>>,
        replacements: Mutex<usize>,
    }

    #[async_trait]
    impl NewsStore for RecordingStore {
        async fn save_articles(&self, _: &[ClassifiedArticle]) -> cw_core::Result<usize> {
            Ok(0)
        }

        async fn recent_articles(&self, _: Duration) -> cw_core::Result<Vec<StoredArticle>> {
            Ok(vec![])
        }

        async fn replace_recommendations(
            &self,
            recommendations: Vec<Recommendation>,
        ) -> cw_core::Result<()> {
            *self.replacements.lock().await += 1;
            *self.recommendations.lock().await = recommendations;
            Ok(())
        }

        async fn recent_recommendations(&self, _: usize) -> cw_core::Result<Vec<Recommendation>> {
            Ok(self.recommendations.lock().await.clone())
        }
    }

    #[tokio::test]
    async fn test_empty_batch_leaves_existing_set_untouched() {
        let store = RecordingStore::default();
        let engine = RecommendationEngine::new(Arc::new(FailingModel));

        engine.update_recommendations(&store, &[]).await.unwrap();
        assert_eq!(*store.replacements.lock().await, 0);
    }

    #[tokio::test]
    async fn test_inference_failure_substitutes_static_advisory() {
        let store = RecordingStore::default();
        let engine = RecommendationEngine::new(Arc::new(FailingModel));
        let batch = vec![article("Phishing"), article("Phishing"), article("Ransomware")];

        engine.update_recommendations(&store, &batch).await.unwrap();

        let stored = store.recommendations.lock().await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].threat_type, "Phishing");
        assert!(stored[0].recommendation.contains("Standard protection measures"));
    }
}
