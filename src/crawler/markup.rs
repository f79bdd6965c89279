//! Structural queries over parsed pages
//!
//! Element text is read the way the site's markup needs it: every
//! descendant text node is trimmed, empty nodes are dropped, and the rest
//! are joined with no separator.

use scraper::{ElementRef, Html, Selector};

/// Returns the stripped text of an element
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Returns all elements of the document matching `css`, in document order
pub fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Returns all descendants of `element` matching `css`, in document order
pub fn select_all_in<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => element.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Returns the first element of the document matching `css`
pub fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

/// Returns the first descendant of `element` matching `css`
pub fn select_first_in<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    element.select(&selector).next()
}

/// Returns the stripped text of the first element matching `css`
pub fn first_text(document: &Html, css: &str) -> Option<String> {
    select_first(document, css).map(stripped_text)
}
