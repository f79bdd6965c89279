//! Output module for listing records
//!
//! This module handles:
//! - The flat `ListingRecord` and the phone lookup outcome
//! - Writing records to CSV
//! - Recording run statistics

mod csv_output;
mod record;
pub mod stats;
mod traits;

pub use csv_output::CsvOutput;
pub use record::{ListingRecord, PhoneLookup};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::OutputHandler;
