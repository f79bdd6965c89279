//! Run statistics
//!
//! Counts are derived from the stage results after each stage completes;
//! nothing here is shared between in-flight tasks.

use crate::output::{ListingRecord, PhoneLookup};
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run reached `Done`
    pub finished_at: Option<DateTime<Utc>>,

    /// Index pages requested
    pub pages_requested: u32,

    /// Index pages that contributed no URLs, whether the fetch failed or the
    /// page had no listing cards
    pub empty_pages: u32,

    /// Listing URLs collected across all index pages (duplicates included)
    pub urls_collected: usize,

    /// Records extracted
    pub records_extracted: usize,

    /// Listings whose page could not be fetched
    pub listings_dropped: usize,

    /// Phone lookups that returned a number
    pub phones_found: usize,

    /// Phone lookups that returned nothing usable
    pub phones_unknown: usize,

    /// Listings without an identifier, so no lookup
    pub phones_not_attempted: usize,
}

impl CrawlStatistics {
    /// Creates an empty statistics block starting now
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_requested: 0,
            empty_pages: 0,
            urls_collected: 0,
            records_extracted: 0,
            listings_dropped: 0,
            phones_found: 0,
            phones_unknown: 0,
            phones_not_attempted: 0,
        }
    }

    /// Records the per-page URL counts of the index stage
    pub fn record_index_stage(&mut self, per_page: &[Vec<String>]) {
        self.pages_requested = per_page.len() as u32;
        self.empty_pages = per_page.iter().filter(|urls| urls.is_empty()).count() as u32;
        self.urls_collected = per_page.iter().map(Vec::len).sum();
    }

    /// Records the outcome of the detail stage
    pub fn record_detail_stage(&mut self, records: &[ListingRecord]) {
        self.records_extracted = records.len();
        self.listings_dropped = self.urls_collected.saturating_sub(records.len());

        for record in records {
            match record.phone {
                PhoneLookup::Found(_) => self.phones_found += 1,
                PhoneLookup::Unknown => self.phones_unknown += 1,
                PhoneLookup::NotAttempted => self.phones_not_attempted += 1,
            }
        }
    }

    /// Marks the run as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Duration of the run in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Share of collected listings that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.urls_collected == 0 {
            return 0.0;
        }
        (self.records_extracted as f64 / self.urls_collected as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    println!("Index:");
    println!("  Pages requested: {}", stats.pages_requested);
    println!("  Pages without listings: {}", stats.empty_pages);
    println!("  Listing URLs collected: {}", stats.urls_collected);
    println!();

    println!("Listings:");
    println!("  Records extracted: {}", stats.records_extracted);
    println!("  Dropped (fetch failed): {}", stats.listings_dropped);
    println!();

    println!("Phones:");
    println!("  Found: {}", stats.phones_found);
    println!("  N/A: {}", stats.phones_unknown);
    println!("  Not attempted: {}", stats.phones_not_attempted);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} listings extracted)",
        stats.success_rate(),
        stats.records_extracted,
        stats.urls_collected
    );
}
