//! Page count detection
//!
//! Pagination links on the index advertise raw item offsets
//! (`?page=24`, `?page=48`, ...), so the largest offset divided by the
//! stride gives the index of the last page.

use crate::config::Config;
use crate::crawler::fetcher::{FetchRequest, Fetcher};
use crate::crawler::markup::{select_all_in, select_first};
use crate::url::{index_url, PageOffset};
use scraper::Html;

/// Extracts the offset from a pagination href
///
/// The offset is the text between `page=` and the next `&`. Returns None
/// when there is no `page=` or the value is not an unsigned integer.
pub fn parse_page_offset(href: &str) -> Option<u64> {
    let (_, rest) = href.split_once("page=")?;
    let raw = rest.split('&').next().unwrap_or_default();
    raw.trim().parse().ok()
}

/// Returns the largest offset advertised by the pagination controls
///
/// Links whose offset does not parse are skipped. A page without
/// pagination controls yields 0.
pub fn max_page_offset(html: &str) -> u64 {
    let document = Html::parse_document(html);

    let Some(pagination) = select_first(&document, "ul.pagination") else {
        return 0;
    };

    select_all_in(pagination, "a")
        .into_iter()
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| {
            let offset = parse_page_offset(href);
            if offset.is_none() && href.contains("page=") {
                tracing::debug!(href, "Skipping unparsable pagination offset");
            }
            offset
        })
        .max()
        .unwrap_or(0)
}

/// Converts the largest advertised offset into a page count
///
/// `floor(max_offset / stride) + 1` when an offset was seen, otherwise 1.
///
/// # Example
///
/// ```
/// use evv_harvest::crawler::total_pages;
///
/// assert_eq!(total_pages(16560, 24), 691);
/// assert_eq!(total_pages(0, 24), 1);
/// ```
pub fn total_pages(max_offset: u64, stride: u32) -> u32 {
    if max_offset == 0 || stride == 0 {
        return 1;
    }
    let pages = max_offset / u64::from(stride) + 1;
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Fetches the first index page and detects how many pages exist
///
/// A failed fetch degrades to 1: the first page is assumed to exist.
pub async fn detect_total_pages(fetcher: &Fetcher, config: &Config) -> u32 {
    let url = index_url(&config.site, PageOffset::FIRST);

    let Some(html) = fetcher.fetch(FetchRequest::get(url)).await else {
        return 1;
    };

    let max_offset = max_page_offset(&html);
    let pages = total_pages(max_offset, config.crawler.page_stride);

    tracing::info!("Max page offset detected: {}", max_offset);
    tracing::info!("Calculated total pages: {}", pages);

    pages
}
