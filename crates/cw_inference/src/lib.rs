pub mod classifier;
pub mod openai;
pub mod recommend;

pub use classifier::Classifier;
pub use openai::OpenAiModel;
pub use recommend::{trending_threats, RecommendationEngine};

pub mod prelude {
    pub use super::classifier::Classifier;
    pub use super::openai::OpenAiModel;
    pub use super::recommend::RecommendationEngine;
    pub use cw_core::{Classification, ClassifiedArticle, Error, InferenceModel, Result};
}
