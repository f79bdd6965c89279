//! Crawler module for the two-stage listing crawl
//!
//! This module contains the core crawling logic, including:
//! - Bounded HTTP fetching that folds every failure into "no data"
//! - Page count detection from the pagination controls
//! - Listing URL collection from index pages
//! - Per-listing field extraction and phone lookup
//! - Overall crawl coordination

mod coordinator;
mod detail;
mod fetcher;
mod index;
mod markup;
mod pagination;
mod phone;

pub use coordinator::{run_crawl, Coordinator, CrawlReport, PageSelection};
pub use detail::{
    apply_options, classify_label, extract_listing, is_locality, scrape_listing, OptionField,
    LOCALITY_MARKERS, OPTION_KEYWORDS,
};
pub use fetcher::{base_headers, build_http_client, FetchError, FetchRequest, Fetcher};
pub use index::{collect_listing_urls, extract_listing_urls};
pub use pagination::{detect_total_pages, max_page_offset, parse_page_offset, total_pages};
pub use phone::{ajax_headers, parse_phone, resolve_phone};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and the concurrency bound
/// 2. Resolve the page count
/// 3. Collect listing URLs from every index page
/// 4. Extract a record from every listing page
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `selection` - How many index pages to visit
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Records in listing order plus run statistics
/// * `Err(HarvestError)` - The run could not be set up
pub async fn crawl(config: Config, selection: PageSelection) -> Result<CrawlReport, HarvestError> {
    run_crawl(config, selection).await
}
