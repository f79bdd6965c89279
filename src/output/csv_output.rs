//! CSV record writer

use crate::output::{ListingRecord, OutputHandler};
use crate::{OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes listing records as CSV with a header row
pub struct CsvOutput<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvOutput<File> {
    /// Creates (or truncates) the CSV file at `path`
    ///
    /// Missing parent directories are created first.
    pub fn create(path: &Path) -> OutputResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvOutput<W> {
    /// Wraps any writer
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::from(e.into_error()))
    }
}

impl<W: Write> OutputHandler for CsvOutput<W> {
    fn write_record(&mut self, record: &ListingRecord) -> OutputResult<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
