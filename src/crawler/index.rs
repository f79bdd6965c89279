//! Index page listing collection

use crate::config::SiteConfig;
use crate::crawler::fetcher::{FetchRequest, Fetcher};
use crate::crawler::markup::{select_all_in, select_first};
use crate::url::{index_url, resolve_href, PageOffset};
use scraper::Html;
use url::Url;

/// Container that holds the listing cards on an index page
const LISTINGS_CONTAINER: &str = "div.row.g-lg-4.g-md-3.g-sm-3.g-3";

/// Anchor wrapping each card's image; its href is the listing page
const LISTING_LINK: &str = "a.img_link";

/// Extracts the absolute listing URLs from an index page
///
/// Only image links inside the first listings container count. Order
/// within the page is preserved.
pub fn extract_listing_urls(html: &str, origin: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let Some(container) = select_first(&document, LISTINGS_CONTAINER) else {
        return Vec::new();
    };

    select_all_in(container, LISTING_LINK)
        .into_iter()
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| resolve_href(origin, href))
        .collect()
}

/// Fetches one index page and returns the listing URLs it links to
///
/// `page_num` is only used for logging. A failed fetch contributes no URLs.
pub async fn collect_listing_urls(
    fetcher: &Fetcher,
    site: &SiteConfig,
    origin: &Url,
    offset: PageOffset,
    page_num: u32,
) -> Vec<String> {
    let url = index_url(site, offset);
    tracing::info!(page = page_num, %offset, "[Page {}] Fetching: {}", page_num, url);

    let Some(html) = fetcher.fetch(FetchRequest::get(url)).await else {
        return Vec::new();
    };

    let urls = extract_listing_urls(&html, origin);
    tracing::info!(page = page_num, "[Page {}] Found {} listings", page_num, urls.len());
    urls
}
