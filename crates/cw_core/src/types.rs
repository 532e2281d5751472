use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered news source: where to fetch it and which region it reports on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
    pub region: String,
}

/// An article as extracted from a source page, before classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub url: String,
    pub source: String,
    pub region: String,
    /// Extracted body text, possibly empty when the body fetch failed.
    pub summary: String,
}

fn default_category() -> String {
    "Uncategorized".to_string()
}

fn default_threat_type() -> String {
    "Other".to_string()
}

/// The structured result of a classification request. A response missing a
/// field keeps whichever field is present; the absent one takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_threat_type")]
    pub threat_type: String,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            category: "Uncategorized".to_string(),
            threat_type: "Other".to_string(),
        }
    }
}

/// A raw article enriched with its classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedArticle {
    pub title: String,
    pub url: String,
    pub source: String,
    pub region: String,
    pub summary: String,
    pub category: String,
    pub threat_type: String,
}

impl ClassifiedArticle {
    pub fn new(raw: RawArticle, classification: Classification) -> Self {
        Self {
            title: raw.title,
            url: raw.url,
            source: raw.source,
            region: raw.region,
            summary: raw.summary,
            category: classification.category,
            threat_type: classification.threat_type,
        }
    }
}

/// An article as persisted by the store. Never mutated after the first write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredArticle {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub source: String,
    pub region: String,
    pub summary: String,
    pub category: String,
    pub threat_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredArticle> for ClassifiedArticle {
    fn from(stored: StoredArticle) -> Self {
        Self {
            title: stored.title,
            url: stored.url,
            source: stored.source,
            region: stored.region,
            summary: stored.summary,
            category: stored.category,
            threat_type: stored.threat_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub threat_type: String,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingThreat {
    pub threat_type: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_classification_keeps_present_field() {
        let classification: Classification =
            serde_json::from_str(r#"{"category": "Privacy"}"#).unwrap();
        assert_eq!(classification.category, "Privacy");
        assert_eq!(classification.threat_type, "Other");

        let classification: Classification =
            serde_json::from_str(r#"{"threat_type": "Phishing"}"#).unwrap();
        assert_eq!(classification.category, "Uncategorized");
        assert_eq!(classification.threat_type, "Phishing");
    }

    #[test]
    fn test_empty_classification_takes_defaults() {
        let classification: Classification = serde_json::from_str("{}").unwrap();
        assert_eq!(classification, Classification::default());
    }
}
