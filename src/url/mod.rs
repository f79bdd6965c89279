//! URL handling module for Evv-Harvest
//!
//! This module builds index page URLs from pagination offsets, resolves
//! listing links against the site origin, and derives a listing identifier
//! from a listing URL when the page itself does not carry one.

mod offset;
mod resolve;

// Re-export main types and functions
pub use offset::{index_url, PageOffset};
pub use resolve::{listing_id_from_url, resolve_href};
