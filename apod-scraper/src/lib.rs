pub mod archive;
pub mod config;
pub mod entry;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod run;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::archive::{collect_links, EntryLink};
pub use crate::config::Config;
pub use crate::entry::{Entry, EntryPage, EntryRecord};
pub use crate::error::{DateParseError, EntryError, FetchError, RunError, StoreError};
pub use crate::fetch::{Fetch, HttpFetcher};
pub use crate::run::{scrape_archive, RunSummary};
pub use crate::store::Store;
