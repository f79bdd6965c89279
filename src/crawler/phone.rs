//! Phone number lookup through the site's AJAX endpoint
//!
//! The listing page hides the number; the site reveals it by POSTing the
//! listing id to a fixed endpoint and swapping in the returned fragment.

use crate::config::SiteConfig;
use crate::crawler::fetcher::{FetchRequest, Fetcher};
use crate::crawler::markup::{select_first, stripped_text};
use crate::output::PhoneLookup;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER};
use scraper::{ElementRef, Html};

/// Headers marking the request as an in-page AJAX call
///
/// These are merged over the base browser header set.
pub fn ajax_headers(site: &SiteConfig) -> HeaderMap {
    let origin = site.origin.trim_end_matches('/');
    let mut headers = HeaderMap::new();

    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
    );
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );

    // Origin is a validated URL
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(ORIGIN, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("{}/", origin)) {
        headers.insert(REFERER, value);
    }

    headers
}

/// Reads the phone number out of the endpoint's HTML fragment
///
/// The number is the text of the element containing the phone icon.
/// Returns None when the icon is absent.
pub fn parse_phone(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    let icon = select_first(&fragment, "img.phone_icon")?;
    let parent = icon.parent().and_then(ElementRef::wrap)?;
    Some(stripped_text(parent))
}

/// Looks up the phone number for a listing
///
/// Never fails: a failed request and a response without the phone marker
/// both yield `PhoneLookup::Unknown`.
pub async fn resolve_phone(fetcher: &Fetcher, site: &SiteConfig, listing_id: &str) -> PhoneLookup {
    let url = format!("{}{}", site.origin.trim_end_matches('/'), site.phone_path);
    let request = FetchRequest::post_form(url, vec![("id".to_string(), listing_id.to_string())])
        .with_headers(ajax_headers(site));

    let Some(html) = fetcher.fetch(request).await else {
        return PhoneLookup::Unknown;
    };

    match parse_phone(&html) {
        Some(phone) => PhoneLookup::Found(phone),
        None => {
            tracing::debug!(listing_id, "Phone marker missing from response");
            PhoneLookup::Unknown
        }
    }
}
