use std::sync::Arc;
use tracing::warn;

use cw_core::{Classification, ClassifiedArticle, InferenceModel, RawArticle};

pub const CATEGORIES: &[&str] = &[
    "Malware & Threats",
    "Data Breach",
    "Vulnerability",
    "Privacy",
    "Security Research",
    "Industry News",
];

pub const THREAT_TYPES: &[&str] = &[
    "Phishing",
    "Ransomware",
    "Data Breach",
    "Social Engineering",
    "Zero-day Vulnerability",
    "Supply Chain Attack",
    "DDoS",
    "Insider Threat",
    "Other",
];

pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_THREAT_TYPE: &str = "Other";

/// Only this much of the article body is sent for classification.
const MAX_EXCERPT_CHARS: usize = 1000;

/// Truncate to a maximum number of characters, never splitting a char.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The prompt constrains values to the fixed enumerations, but the model is
/// not obliged to comply. Anything unrecognized clamps to the defaults.
fn clamp(classification: Classification) -> Classification {
    let category = if CATEGORIES.contains(&classification.category.as_str()) {
        classification.category
    } else {
        DEFAULT_CATEGORY.to_string()
    };
    let threat_type = if THREAT_TYPES.contains(&classification.threat_type.as_str()) {
        classification.threat_type
    } else {
        DEFAULT_THREAT_TYPE.to_string()
    };
    Classification { category, threat_type }
}

/// Wraps an inference model with the classification contract: truncated
/// input, enumeration clamping, and a default result on any failure.
/// Classification never raises past this boundary.
pub struct Classifier {
    model: Arc<dyn InferenceModel>,
}

impl Classifier {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self { model }
    }

    pub async fn classify_article(&self, raw: RawArticle) -> ClassifiedArticle {
        let excerpt = truncate_chars(&raw.summary, MAX_EXCERPT_CHARS);
        let classification = match self.model.classify(&raw.title, excerpt).await {
            Ok(classification) => clamp(classification),
            Err(e) => {
                warn!("classification failed for {}: {}", raw.url, e);
                Classification::default()
            }
        };
        ClassifiedArticle::new(raw, classification)
    }

    /// Classify a batch one article at a time, preserving order.
    pub async fn classify_batch(&self, raws: Vec<RawArticle>) -> Vec<ClassifiedArticle> {
        let mut classified = Vec::with_capacity(raws.len());
        for raw in raws {
            classified.push(self.classify_article(raw).await);
        }
        classified
    }
}
