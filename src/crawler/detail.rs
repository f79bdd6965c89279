//! Listing detail extraction
//!
//! Every field is an optional lookup: a missing element leaves the field
//! empty and never aborts the record.

use crate::config::Config;
use crate::crawler::fetcher::{FetchRequest, Fetcher};
use crate::crawler::markup::{first_text, select_all, select_all_in, select_first_in, stripped_text};
use crate::crawler::phone::resolve_phone;
use crate::output::ListingRecord;
use crate::url::listing_id_from_url;
use scraper::Html;
use std::time::Duration;

/// Record fields filled from the "options" blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionField {
    PropertyType,
    City,
    Document,
    Floor,
    Area,
    Rooms,
    Mortgage,
    Furnished,
    LandArea,
}

impl OptionField {
    fn slot<'r>(&self, record: &'r mut ListingRecord) -> &'r mut String {
        match self {
            Self::PropertyType => &mut record.property_type,
            Self::City => &mut record.city,
            Self::Document => &mut record.document,
            Self::Floor => &mut record.floor,
            Self::Area => &mut record.area,
            Self::Rooms => &mut record.rooms,
            Self::Mortgage => &mut record.mortgage,
            Self::Furnished => &mut record.furnished,
            Self::LandArea => &mut record.land_area,
        }
    }
}

/// Label keyword → field, checked in order; the first keyword contained in
/// a label decides the field for that block.
///
/// Matching is case-sensitive, so `Torpaq sahəsi` never hits `Sahəsi`.
pub const OPTION_KEYWORDS: [(&str, OptionField); 9] = [
    ("Mülkün növü", OptionField::PropertyType),
    ("Şəhər", OptionField::City),
    ("Sənədi", OptionField::Document),
    ("Mərtəbə", OptionField::Floor),
    ("Sahəsi", OptionField::Area),
    ("Otaq sayı", OptionField::Rooms),
    ("İpoteka", OptionField::Mortgage),
    ("Əşyası", OptionField::Furnished),
    ("Torpaq sahəsi", OptionField::LandArea),
];

/// Substrings that mark a card body as an address
pub const LOCALITY_MARKERS: [&str; 4] = ["Gəncə", "Bakı", "ş.", "qəs."];

const VIEWS_LABEL: &str = "Baxışların sayı:";
const POST_DATE_LABEL: &str = "Elanın tarixi:";
const UPDATE_DATE_LABEL: &str = "Yenilənmə tarixi";

/// Returns the field a label belongs to, if any
pub fn classify_label(label: &str) -> Option<OptionField> {
    OPTION_KEYWORDS
        .iter()
        .find(|(keyword, _)| label.contains(keyword))
        .map(|(_, field)| *field)
}

/// Folds (label, value) pairs into the record in document order
///
/// A later block with the same field overwrites an earlier one.
pub fn apply_options<I>(record: &mut ListingRecord, pairs: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (label, value) in pairs {
        if let Some(field) = classify_label(&label) {
            *field.slot(record) = value;
        }
    }
}

/// Returns true if the text looks like an address
pub fn is_locality(text: &str) -> bool {
    LOCALITY_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Text after the last colon, trimmed
fn after_colon(text: &str) -> String {
    text.rsplit(':').next().unwrap_or_default().trim().to_string()
}

/// Extracts every field except the phone from a listing page
///
/// The phone needs a network round trip and is filled by
/// [`scrape_listing`].
pub fn extract_listing(html: &str, url: &str) -> ListingRecord {
    let document = Html::parse_document(html);
    let mut record = ListingRecord::new(url);

    record.listing_id = match first_text(&document, "span.estate_id") {
        Some(id) => id,
        None => listing_id_from_url(url),
    };

    if let Some(title) = first_text(&document, "h1") {
        record.title = title;
    }

    if let Some(price) = first_text(&document, "div.price_val") {
        record.price = price.replace('₼', "").trim().to_string();
    }

    if let Some(name) = first_text(&document, "h5.card-title") {
        record.seller_name = name;
    }

    if let Some(kind) = first_text(&document, "p.text-muted") {
        record.seller_type = kind;
    }

    let option_pairs = select_all(&document, "div.options")
        .into_iter()
        .filter_map(|block| {
            let label = select_first_in(block, "span.float-start")?;
            let value = select_first_in(block, "span.float-end")?;
            Some((stripped_text(label), stripped_text(value)))
        });
    apply_options(&mut record, option_pairs);

    if let Some(description) = first_text(&document, "blockquote") {
        record.description = description;
    }

    if let Some(location) = first_text(&document, "div.card-body") {
        if is_locality(&location) {
            record.location = location;
        }
    }

    for tools in select_all(&document, "ul.prop_tools") {
        for item in select_all_in(tools, "li") {
            let text = stripped_text(item);

            if text.contains(VIEWS_LABEL) {
                record.views = after_colon(&text);
            } else if text.contains(POST_DATE_LABEL) {
                record.post_date = after_colon(&text);
            } else if text.contains(UPDATE_DATE_LABEL) {
                if let Some(time) = select_first_in(item, "time") {
                    record.update_date = stripped_text(time);
                }
            }
        }
    }

    record
}

/// Fetches one listing page and builds its record
///
/// `idx` and `total` are only used for logging. Returns None when the page
/// cannot be fetched; the listing is then dropped from the output. The
/// phone lookup runs only when a listing id is known, after a short pause.
pub async fn scrape_listing(
    fetcher: &Fetcher,
    config: &Config,
    url: &str,
    idx: usize,
    total: usize,
) -> Option<ListingRecord> {
    tracing::info!("[{}/{}] Scraping: {}", idx, total, url);

    let html = fetcher.fetch(FetchRequest::get(url)).await?;
    let mut record = extract_listing(&html, url);

    if !record.listing_id.is_empty() {
        let delay = config.crawler.phone_delay_ms;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        record.phone = resolve_phone(fetcher, &config.site, &record.listing_id).await;
    }

    Some(record)
}
