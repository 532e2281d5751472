pub mod extract;
pub mod manager;
pub mod site;
pub mod sources;

pub use manager::ScrapeManager;
pub use site::{Scraper, SiteScraper};
pub use sources::sources;

pub mod prelude {
    pub use super::site::Scraper;
    pub use cw_core::{Error, RawArticle, Result, Source};
}
