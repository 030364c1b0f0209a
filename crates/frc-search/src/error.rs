use thiserror::Error;

/// Failures while assembling a [`crate::SearchEngine`]. Searching itself
/// never fails.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("catalog error: {0}")]
    Catalog(#[from] frc_core::ConfigError),

    #[error("fetch client error: {0}")]
    Client(#[from] frc_scraper::ScraperError),
}
