//! Link resolution and URL-derived listing identifiers

use url::Url;

/// Resolves an `href` to an absolute URL against the site origin
///
/// Returns None for empty hrefs and for hrefs the URL parser rejects.
/// The result is the parser's serialization, so spaces and non-ASCII
/// characters in the path come back percent-encoded.
pub fn resolve_href(origin: &Url, href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }

    origin.join(href).ok().map(|url| url.to_string())
}

/// Derives a listing identifier from its URL
///
/// Trailing slashes are removed and the last hyphen-delimited token is kept,
/// so `.../elan-12345/` yields `12345`. A URL without hyphens yields the whole
/// trimmed string.
pub fn listing_id_from_url(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('-')
        .next()
        .unwrap_or_default()
        .to_string()
}
