use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static ENTRY_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ap[0-9]+\.html").expect("entry href pattern"));

/// One `apNNNNNN.html` anchor on the archive index.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryLink {
    pub href: String,
    /// Anchor text, verbatim. This is the entry title.
    pub title: String,
    /// The text node right before the anchor, e.g. `"2020 January 01:  "`.
    /// `None` when the anchor is not preceded by text.
    pub preceding_text: Option<String>,
}

/// Collect entry links from the archive index in document order.
///
/// Duplicates are kept.
pub fn collect_links(markup: &str) -> Vec<EntryLink> {
    let document = Html::parse_document(markup);
    let anchor_selector = Selector::parse("a[href]").unwrap();

    document
        .select(&anchor_selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            if !ENTRY_HREF.is_match(href) {
                return None;
            }
            Some(EntryLink {
                href: href.to_string(),
                title: anchor.text().collect(),
                preceding_text: preceding_text(&anchor),
            })
        })
        .collect()
}

fn preceding_text(anchor: &ElementRef) -> Option<String> {
    anchor
        .prev_sibling()
        .and_then(|node| node.value().as_text().map(|text| text.to_string()))
}
