use std::fmt;

use url::Url;

use crate::archive::collect_links;
use crate::config::Config;
use crate::entry::Entry;
use crate::error::RunError;
use crate::fetch::Fetch;
use crate::store::Store;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub links: usize,
    pub saved: usize,
    pub up_to_date: usize,
    pub without_media: usize,
    pub failed: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} links: {} saved, {} already current, {} without media, {} failed",
            self.links, self.saved, self.up_to_date, self.without_media, self.failed
        )
    }
}

/// Scrape every entry on the archive index into `store`.
///
/// A bad entry is logged and skipped. Only a missing index or a storage
/// failure stops the run.
pub fn scrape_archive(
    config: &Config,
    fetcher: &impl Fetch,
    store: &mut Store,
) -> Result<RunSummary, RunError> {
    let base = Url::parse(&config.base_path).map_err(|source| RunError::BasePath {
        base_path: config.base_path.clone(),
        source,
    })?;

    let archive_url = config.archive_url();
    log::info!("Fetching archive index {}", archive_url);
    let index = fetcher.fetch(&archive_url).map_err(RunError::Index)?;
    let links = collect_links(&index);
    log::info!("Found {} entry links", links.len());

    let mut summary = RunSummary {
        links: links.len(),
        ..RunSummary::default()
    };

    for link in &links {
        let entry = match Entry::new(link, &base) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping {}: {}", link.href, e);
                summary.failed += 1;
                continue;
            }
        };

        if !store.needs_scrape(entry.url(), &config.data_version)? {
            log::debug!("{} already scraped at {}", entry.url(), config.data_version);
            summary.up_to_date += 1;
            continue;
        }

        match entry.extract(fetcher) {
            Ok(Some(record)) => {
                store.save(&record, &config.data_version)?;
                log::info!("Saved {} ({}) {}", record.url, record.date, record.title);
                summary.saved += 1;
            }
            Ok(None) => {
                log::debug!("{} has no picture or video", entry.url());
                summary.without_media += 1;
            }
            Err(e) => {
                log::warn!("Failed to scrape {}: {}", entry.url(), e);
                summary.failed += 1;
            }
        }
    }

    log::info!("Done: {}", summary);
    Ok(summary)
}
