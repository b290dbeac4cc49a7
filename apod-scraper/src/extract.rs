//! Field extraction for archive entry pages.
//!
//! Entry pages span decades of hand-written HTML, so the credit and
//! explanation are found by scanning the serialized markup rather than by
//! walking the tree. Every miss resolves to an empty string. Only the date is
//! allowed to fail.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Month, NaiveDate};
use regex::{Captures, Regex};
use scraper::{Html, Selector};
use stringmetrics::levenshtein_limit;
use url::Url;

use crate::error::DateParseError;

/// Fraction of the title length that may be edited and still count as the title.
const TITLE_EDIT_RATIO: f64 = 0.25;

static BOLD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<b>").expect("bold pattern"));

// Anchored at a `<b>`: the bold text, then everything up to the next paragraph.
static TITLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?si)\A<b>\s*([^<]*?)\s*<(?:/b|br[^>]*)>(.*?)<p>")
        .expect("title block pattern")
});

static TITLE_TO_EXPLANATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?si)<b>.*?<(?:/b|br[^>]*)>(.*?)<p>.*?<(?:b|h3)>\s*Explanation:?\s*</(?:b|h3)>:?",
    )
    .expect("title to explanation pattern")
});

static EXPLANATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?si)<(?:b|h3)>\s*Explanation:?\s*</(?:b|h3)>:?(.*?)<p>")
        .expect("explanation pattern")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern"));

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(/?)([a-zA-Z][a-zA-Z0-9]*)\b([^>]*)>").expect("tag pattern")
});

// Serialized documents write U+00A0 back out as an entity.
static NBSP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&nbsp;|&#160;|&#x0*a0;").expect("nbsp pattern"));

static HREF_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).expect("href pattern")
});

/// Parse the index text preceding an entry link into `YYYY-MM-DD`.
///
/// The last three characters are dropped first; on the archive index that is
/// the `":  "` between the date and the anchor.
pub fn parse_entry_date(preceding_text: &str) -> Result<String, DateParseError> {
    let mut chars = preceding_text.chars();
    for _ in 0..3 {
        chars.next_back();
    }
    let raw = chars.as_str();

    parse_natural_date(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| DateParseError {
            text: raw.trim().to_string(),
        })
}

/// Lenient date parsing in the spirit of a natural-language parser.
///
/// Accepts `2020 January 01`, `January 1st, 2020`, `1 Jan 2020` and
/// `2020-01-01`. Words that are not month names are ignored.
pub fn parse_natural_date(text: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();

    let month_name = tokens
        .iter()
        .find_map(|token| Month::from_str(token).ok())
        .map(|month| month.number_from_month());

    let mut year = None;
    let mut small_numbers = Vec::new();
    for token in &tokens {
        let token = strip_ordinal(token);
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        match token.len() {
            4 if year.is_none() => year = token.parse::<i32>().ok(),
            1 | 2 => small_numbers.extend(token.parse::<u32>().ok()),
            _ => {}
        }
    }

    let year = year?;
    let (month, day) = match month_name {
        Some(month) => (month, *small_numbers.first()?),
        None => (*small_numbers.first()?, *small_numbers.get(1)?),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

// "1st" -> "1"
fn strip_ordinal(token: &str) -> &str {
    let split = token.len().saturating_sub(2);
    match (token.get(..split), token.get(split..)) {
        (Some(digits), Some(suffix))
            if !digits.is_empty()
                && digits.chars().all(|c| c.is_ascii_digit())
                && ["st", "nd", "rd", "th"]
                    .iter()
                    .any(|s| suffix.eq_ignore_ascii_case(s)) =>
        {
            digits
        }
        _ => token,
    }
}

/// Find the credit block: the content after the (fuzzily matched) title
/// heading up to the next paragraph, or failing that, whatever sits between
/// the first bold block and the "Explanation" label.
pub fn extract_credit(markup: &str, title: &str) -> String {
    let max_edits = (title.chars().count() as f64 * TITLE_EDIT_RATIO) as u32;

    let after_title = BOLD_OPEN.find_iter(markup).find_map(|bold| {
        let caps = TITLE_BLOCK.captures(&markup[bold.start()..])?;
        title_matches(&caps[1], title, max_edits).then(|| caps[2].to_string())
    });

    let credit = after_title.or_else(|| {
        TITLE_TO_EXPLANATION
            .captures(markup)
            .map(|caps| caps[1].to_string())
    });

    credit.map(|raw| sanitize_fragment(&raw)).unwrap_or_default()
}

pub fn extract_explanation(markup: &str) -> String {
    EXPLANATION
        .captures(markup)
        .map(|caps| sanitize_fragment(&caps[1]))
        .unwrap_or_default()
}

fn title_matches(candidate: &str, title: &str, max_edits: u32) -> bool {
    let candidate = candidate.trim().to_lowercase();
    let title = title.trim().to_lowercase();
    // Stops counting once past the limit
    levenshtein_limit(&candidate, &title, max_edits + 1) <= max_edits
}

/// Strip every tag except `<a>`, keep only the `href` on anchors, and
/// collapse runs of whitespace to a single space.
pub fn sanitize_fragment(fragment: &str) -> String {
    let without_comments = COMMENT.replace_all(fragment, "");
    let anchors_only = TAG.replace_all(&without_comments, |caps: &Captures| {
        if !caps[2].eq_ignore_ascii_case("a") {
            return String::new();
        }
        if !caps[1].is_empty() {
            return "</a>".to_string();
        }
        match href_value(&caps[3]) {
            Some(href) => format!("<a href=\"{}\">", href.replace('"', "&quot;")),
            None => "<a>".to_string(),
        }
    });
    let spaced = NBSP.replace_all(&anchors_only, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn href_value(attributes: &str) -> Option<&str> {
    let caps = HREF_ATTR.captures(attributes)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

/// First `<img>` whose src points into `image/`, resolved against `base`.
pub fn extract_picture_thumbnail_url(document: &Html, base: &Url) -> String {
    let img_selector = Selector::parse("img[src]").unwrap();
    document
        .select(&img_selector)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| src.contains("image/"))
        .map(|src| {
            base.join(src.trim())
                .map(|url| url.to_string())
                .unwrap_or_else(|_| format!("{}{}", base, src))
        })
        .unwrap_or_default()
}

/// First anchor linking into the site's own `image/` directory.
///
/// Expects hrefs to have been made absolute already.
pub fn extract_picture_url(document: &Html, base: &Url) -> String {
    let a_selector = Selector::parse("a[href]").unwrap();
    let image_root = format!("{}image/", base);
    document
        .select(&a_selector)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains(&image_root))
        .map(|href| href.to_string())
        .unwrap_or_default()
}

pub fn extract_video_url(document: &Html) -> String {
    let iframe_selector = Selector::parse("iframe").unwrap();
    document
        .select(&iframe_selector)
        .next()
        .and_then(|iframe| iframe.value().attr("src"))
        .map(|src| src.to_string())
        .unwrap_or_default()
}
