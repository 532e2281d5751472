pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::Error;
pub use models::InferenceModel;
pub use storage::NewsStore;
pub use types::{
    Classification, ClassifiedArticle, RawArticle, Recommendation, Source, StoredArticle,
    TrendingThreat,
};

pub type Result<T> = std::result::Result<T, Error>;
