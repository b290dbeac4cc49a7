use std::cell::OnceCell;

use scraper::Html;
use serde::Serialize;
use url::Url;

use crate::archive::EntryLink;
use crate::error::{DateParseError, EntryError, FetchError};
use crate::extract::{
    extract_credit, extract_explanation, extract_picture_thumbnail_url, extract_picture_url,
    extract_video_url, parse_entry_date,
};
use crate::fetch::{absolutize_links, Fetch};

/// One row of the entries table.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct EntryRecord {
    pub url: String,
    pub date: String,
    pub title: String,
    pub credit: String,
    pub explanation: String,
    pub picture_thumbnail_url: String,
    pub picture_url: String,
    pub video_url: String,
}

impl EntryRecord {
    pub fn has_media(&self) -> bool {
        !self.picture_thumbnail_url.is_empty() || !self.video_url.is_empty()
    }
}

/// A fetched entry page with its links already made absolute.
pub struct EntryPage {
    /// Serialized document, the text the credit and explanation patterns scan.
    markup: String,
    document: Html,
}

impl EntryPage {
    pub fn parse(raw: &str, base: &Url) -> Self {
        let document = Html::parse_document(&absolutize_links(raw, base));
        EntryPage {
            markup: document.html(),
            document,
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn credit(&self, title: &str) -> String {
        extract_credit(&self.markup, title)
    }

    pub fn explanation(&self) -> String {
        extract_explanation(&self.markup)
    }

    pub fn picture_thumbnail_url(&self, base: &Url) -> String {
        extract_picture_thumbnail_url(&self.document, base)
    }

    pub fn picture_url(&self, base: &Url) -> String {
        extract_picture_url(&self.document, base)
    }

    pub fn video_url(&self) -> String {
        extract_video_url(&self.document)
    }

    /// Everything the page itself provides, plus the index-derived fields.
    pub fn record(&self, url: &str, date: String, title: &str, base: &Url) -> EntryRecord {
        EntryRecord {
            url: url.to_string(),
            date,
            title: title.to_string(),
            credit: self.credit(title),
            explanation: self.explanation(),
            picture_thumbnail_url: self.picture_thumbnail_url(base),
            picture_url: self.picture_url(base),
            video_url: self.video_url(),
        }
    }
}

/// An archive entry. The page is fetched on first use and kept for the
/// lifetime of the entry.
pub struct Entry<'a> {
    link: &'a EntryLink,
    base: &'a Url,
    url: Url,
    page: OnceCell<EntryPage>,
}

impl<'a> Entry<'a> {
    pub fn new(link: &'a EntryLink, base: &'a Url) -> Result<Self, EntryError> {
        let url = base.join(&link.href).map_err(|source| EntryError::Url {
            href: link.href.clone(),
            source,
        })?;
        Ok(Entry {
            link,
            base,
            url,
            page: OnceCell::new(),
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn title(&self) -> &str {
        &self.link.title
    }

    pub fn date(&self) -> Result<String, DateParseError> {
        parse_entry_date(self.link.preceding_text.as_deref().unwrap_or_default())
    }

    pub fn page(&self, fetcher: &impl Fetch) -> Result<&EntryPage, FetchError> {
        if let Some(page) = self.page.get() {
            return Ok(page);
        }
        let raw = fetcher.fetch(self.url.as_str())?;
        Ok(self.page.get_or_init(|| EntryPage::parse(&raw, self.base)))
    }

    /// Extract the full record.
    ///
    /// Returns `Ok(None)` for entries with neither a picture nor a video;
    /// those are not worth storing.
    pub fn extract(&self, fetcher: &impl Fetch) -> Result<Option<EntryRecord>, EntryError> {
        let page = self.page(fetcher)?;

        if page.picture_thumbnail_url(self.base).is_empty() && page.video_url().is_empty() {
            return Ok(None);
        }

        let date = self.date()?;
        Ok(Some(page.record(self.url(), date, self.title(), self.base)))
    }
}
