//! The flat listing record and its phone outcome

use serde::{Serialize, Serializer};
use std::fmt;

/// Outcome of the phone lookup for one listing
///
/// `NotAttempted` and `Unknown` are kept apart: the first means no listing
/// identifier was available, the second means the lookup ran and found
/// nothing usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PhoneLookup {
    /// No identifier, so no lookup was issued
    #[default]
    NotAttempted,

    /// Lookup issued but failed or carried no phone marker
    Unknown,

    /// Phone number as shown by the site
    Found(String),
}

impl PhoneLookup {
    /// Sentinel written for an attempted lookup that produced nothing
    pub const UNKNOWN_SENTINEL: &'static str = "N/A";

    /// Flat string form used in the output
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotAttempted => "",
            Self::Unknown => Self::UNKNOWN_SENTINEL,
            Self::Found(phone) => phone,
        }
    }

    /// Returns true if a lookup was issued
    pub fn was_attempted(&self) -> bool {
        !matches!(self, Self::NotAttempted)
    }
}

impl fmt::Display for PhoneLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PhoneLookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One scraped listing
///
/// Field order is the column order of the output. Every field defaults to
/// the empty string when the source page does not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    pub listing_id: String,
    pub url: String,
    pub title: String,
    pub price: String,
    pub property_type: String,
    pub city: String,
    pub location: String,
    pub document: String,
    pub floor: String,
    pub area: String,
    pub land_area: String,
    pub rooms: String,
    pub mortgage: String,
    pub furnished: String,
    pub description: String,
    pub seller_name: String,
    pub seller_type: String,
    pub phone: PhoneLookup,
    pub views: String,
    pub post_date: String,
    pub update_date: String,
}

impl ListingRecord {
    /// Column names in output order
    pub const FIELD_NAMES: [&'static str; 21] = [
        "listing_id",
        "url",
        "title",
        "price",
        "property_type",
        "city",
        "location",
        "document",
        "floor",
        "area",
        "land_area",
        "rooms",
        "mortgage",
        "furnished",
        "description",
        "seller_name",
        "seller_type",
        "phone",
        "views",
        "post_date",
        "update_date",
    ];

    /// Creates an empty record for the listing at `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}
