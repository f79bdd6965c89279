//! Evv-Harvest: a bounded two-stage crawler for real-estate listings
//!
//! This crate discovers listing URLs across a paginated index, visits each
//! listing page to extract structured attributes, resolves the contact phone
//! through the site's AJAX endpoint, and writes the results as flat records.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Evv-Harvest operations
///
/// Transport failures never appear here: the fetcher absorbs them and
/// reports "no data" to its callers.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid header value for {name}: {value}")]
    InvalidHeader { name: String, value: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while writing records out
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Evv-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for output operations
pub type OutputResult<T> = std::result::Result<T, OutputError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Coordinator, PageSelection};
pub use output::{ListingRecord, PhoneLookup};
pub use state::CrawlPhase;
