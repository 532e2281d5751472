use async_trait::async_trait;
use crate::types::Classification;
use crate::Result;

#[async_trait]
pub trait InferenceModel: Send + Sync {
    /// Classify an article by category and threat type from its title and
    /// the leading portion of its body text.
    async fn classify(&self, title: &str, summary: &str) -> Result<Classification>;

    /// Generate freeform protective guidance for a threat type.
    async fn recommend(&self, threat_type: &str) -> Result<String>;
}
