//! Configuration module for Evv-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A missing file is not an error for the CLI: `Config::default()` targets the
//! live site with the reference limits.
//!
//! # Example
//!
//! ```no_run
//! use evv_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Concurrency bound: {}", config.crawler.max_concurrent_requests);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HeadersConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
