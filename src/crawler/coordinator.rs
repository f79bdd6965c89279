//! Crawler coordinator - main crawl orchestration logic
//!
//! This module sequences the two-stage pipeline:
//! - Resolving how many index pages to visit
//! - Fetching every index page and flattening the listing URLs in page order
//! - Fetching every listing page and keeping the records that came back
//!
//! All tasks of a stage are created up front and driven together on the
//! current task; the fetcher's bound decides how many requests are actually
//! in flight. Results are gathered positionally, so output order follows
//! launch order, not completion order.

use crate::config::Config;
use crate::crawler::detail::scrape_listing;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::index::collect_listing_urls;
use crate::crawler::pagination::detect_total_pages;
use crate::output::{CrawlStatistics, ListingRecord};
use crate::state::CrawlPhase;
use crate::url::PageOffset;
use crate::HarvestError;
use futures::future::join_all;
use std::sync::Arc;
use url::Url;

/// How the number of index pages is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    /// Crawl exactly this many pages
    Explicit(u32),

    /// Probe the pagination controls for the full page count
    AutoDetect,

    /// Use the configured default page count
    Default,
}

impl PageSelection {
    /// Picks a selection from run inputs
    ///
    /// An explicit count wins over auto-detect, which wins over the default.
    pub fn from_inputs(pages: Option<u32>, auto_detect: bool) -> Self {
        match (pages, auto_detect) {
            (Some(n), _) => Self::Explicit(n),
            (None, true) => Self::AutoDetect,
            (None, false) => Self::Default,
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Records in listing order
    pub records: Vec<ListingRecord>,

    /// Counts gathered along the way
    pub statistics: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Fetcher,
    origin: Url,
    phase: CrawlPhase,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run, in phase `Configured`
    /// * `Err(HarvestError)` - The origin did not parse or the client failed to build
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let fetcher = Fetcher::from_config(&config)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Result<Self, HarvestError> {
        let origin = Url::parse(&config.site.origin)?;

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            origin,
            phase: CrawlPhase::Configured,
        })
    }

    /// Current phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// The fetcher shared by every stage
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    fn advance(&mut self, to: CrawlPhase) -> Result<(), HarvestError> {
        if !self.phase.can_transition_to(to) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        tracing::debug!("Phase {} -> {}", self.phase, to);
        self.phase = to;
        Ok(())
    }

    /// Determines how many index pages to visit
    pub async fn resolve_page_count(&self, selection: PageSelection) -> u32 {
        match selection {
            PageSelection::Explicit(n) => n,
            PageSelection::AutoDetect => {
                tracing::info!("Detecting total number of pages...");
                let pages = detect_total_pages(&self.fetcher, &self.config).await;
                tracing::info!("Total pages detected: {}", pages);
                pages
            }
            PageSelection::Default => self.config.crawler.default_pages,
        }
    }

    /// Fetches every index page and returns the URLs of each, in page order
    pub async fn collect_urls(&self, pages: u32) -> Vec<Vec<String>> {
        let stride = self.config.crawler.page_stride;

        let tasks = (0..pages).map(|i| {
            collect_listing_urls(
                &self.fetcher,
                &self.config.site,
                &self.origin,
                PageOffset::for_page(i, stride),
                i + 1,
            )
        });

        join_all(tasks).await
    }

    /// Fetches every listing page and returns the records that came back
    ///
    /// Listings whose page failed are left out; no placeholder is kept.
    pub async fn collect_details(&self, urls: &[String]) -> Vec<ListingRecord> {
        let total = urls.len();

        let tasks = urls
            .iter()
            .enumerate()
            .map(|(idx, url)| scrape_listing(&self.fetcher, &self.config, url, idx + 1, total));

        join_all(tasks).await.into_iter().flatten().collect()
    }

    /// Runs the whole pipeline once
    ///
    /// Per-page and per-listing failures are absorbed; the only errors are
    /// running the same coordinator twice.
    pub async fn run(&mut self, selection: PageSelection) -> Result<CrawlReport, HarvestError> {
        let mut statistics = CrawlStatistics::start();

        let pages = self.resolve_page_count(selection).await;
        self.advance(CrawlPhase::PageCountResolved)?;
        tracing::info!("Starting to scrape {} page(s)...", pages);

        let per_page = self.collect_urls(pages).await;
        statistics.record_index_stage(&per_page);
        let urls: Vec<String> = per_page.into_iter().flatten().collect();
        self.advance(CrawlPhase::UrlsCollected)?;
        tracing::info!("Total listings found: {}", urls.len());

        let records = self.collect_details(&urls).await;
        statistics.record_detail_stage(&records);
        self.advance(CrawlPhase::DetailsCollected)?;

        statistics.finish();
        self.advance(CrawlPhase::Done)?;
        tracing::info!(
            "Crawl completed: {} records from {} listings",
            records.len(),
            urls.len()
        );

        Ok(CrawlReport {
            records,
            statistics,
        })
    }
}

/// Runs a complete crawl with a fresh coordinator
///
/// # Example
///
/// ```no_run
/// use evv_harvest::config::Config;
/// use evv_harvest::crawler::{run_crawl, PageSelection};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default(), PageSelection::Explicit(1)).await?;
/// println!("{} listings", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, selection: PageSelection) -> Result<CrawlReport, HarvestError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run(selection).await
}
