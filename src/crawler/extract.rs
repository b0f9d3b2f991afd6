//! Raw attribute-value extraction from page bodies
//!
//! The crawl pipeline wants the attribute values exactly as they appear in
//! the document — duplicates, empties, fragments and all. Canonicalization
//! and filtering happen downstream; this stage only collects.

use scraper::{Html, Selector};

/// Attributes whose values can reference crawlable or downloadable content
pub const REFERENCE_ATTRIBUTES: [&str; 3] = ["src", "href", "background"];

/// Returns every `src`, `href` and `background` attribute value in document
/// order, grouped by attribute
pub fn extract_raw_references(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut values = Vec::new();

    for attr in REFERENCE_ATTRIBUTES {
        if let Ok(selector) = Selector::parse(&format!("[{}]", attr)) {
            for element in document.select(&selector) {
                if let Some(value) = element.value().attr(attr) {
                    values.push(value.to_string());
                }
            }
        }
    }

    values
}
