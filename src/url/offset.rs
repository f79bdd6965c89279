//! Pagination offsets and index page URLs

use crate::config::SiteConfig;
use std::fmt;

/// Item offset identifying one index page
///
/// The site paginates by item count, not page number: page `k` (zero-based)
/// starts at offset `k * stride`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageOffset(u64);

impl PageOffset {
    /// The first index page
    pub const FIRST: PageOffset = PageOffset(0);

    /// Offset of the zero-based page `index` for the given stride
    pub fn for_page(index: u32, stride: u32) -> Self {
        Self(u64::from(index) * u64::from(stride))
    }

    /// Raw item offset
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns true for the first page, which is requested without a query
    pub fn is_first(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for PageOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds the index page URL for an offset
///
/// Offset 0 maps to the bare index path; every other offset is passed as
/// `?page=<offset>`.
///
/// # Example
///
/// ```
/// use evv_harvest::config::SiteConfig;
/// use evv_harvest::url::{index_url, PageOffset};
///
/// let site = SiteConfig::default();
/// assert_eq!(
///     index_url(&site, PageOffset::for_page(2, 24)),
///     "https://www.evv.az/dasinmaz-emlak-elanlari?page=48"
/// );
/// ```
pub fn index_url(site: &SiteConfig, offset: PageOffset) -> String {
    let base = format!("{}{}", site.origin.trim_end_matches('/'), site.index_path);
    if offset.is_first() {
        base
    } else {
        format!("{}?page={}", base, offset)
    }
}
