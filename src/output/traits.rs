//! Output handler trait
//!
//! An output handler receives finished records one at a time. The crawl
//! itself never writes; the caller drains a `CrawlReport` into a handler.

use crate::output::ListingRecord;
use crate::OutputResult;

/// Trait for record sinks
pub trait OutputHandler {
    /// Appends one flat record to the destination
    fn write_record(&mut self, record: &ListingRecord) -> OutputResult<()>;

    /// Flushes buffered records
    fn finish(&mut self) -> OutputResult<()>;

    /// Writes every record in order, then finishes
    ///
    /// # Returns
    ///
    /// The number of records written
    fn write_all(&mut self, records: &[ListingRecord]) -> OutputResult<usize> {
        for record in records {
            self.write_record(record)?;
        }
        self.finish()?;
        Ok(records.len())
    }
}
