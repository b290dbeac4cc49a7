//! Typed errors for the scraper library.
//!
//! Field misses are not errors; they resolve to empty strings. Everything here
//! is either fatal for one entry (`EntryError`) or for the run (`StoreError`,
//! or a `FetchError` on the archive index).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{url} is not valid {encoding}")]
    Decode { url: String, encoding: &'static str },
}

#[derive(Debug, Error)]
#[error("not a recognizable date: {text:?}")]
pub struct DateParseError {
    pub text: String,
}

/// Hard failure for a single entry. The run logs it and moves on.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Date(#[from] DateParseError),

    #[error("cannot resolve entry link {href:?}: {source}")]
    Url {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Failures that stop the whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid base path {base_path:?}: {source}")]
    BasePath {
        base_path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot fetch the archive index: {0}")]
    Index(#[source] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
