use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::{Captures, Regex};
use reqwest::blocking::Client;
use url::Url;

use crate::error::FetchError;

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(<a\b[^>]*?\bhref\s*=\s*)(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("anchor href pattern")
});

/// Source of page markup. The run only ever talks to the site through this.
pub trait Fetch {
    /// Fetch `url` and return its markup decoded to UTF-8.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
    encoding: &'static Encoding,
}

impl HttpFetcher {
    pub fn new(encoding: &'static Encoding) -> Self {
        HttpFetcher {
            client: Client::new(),
            encoding,
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response.bytes().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        decode(url, &bytes, self.encoding)
    }
}

/// Decode with the declared encoding, ignoring whatever charset the server
/// claims and any byte order mark.
pub fn decode(url: &str, bytes: &[u8], encoding: &'static Encoding) -> Result<String, FetchError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(FetchError::Decode {
            url: url.to_string(),
            encoding: encoding.name(),
        });
    }
    Ok(text.into_owned())
}

/// Rewrite every anchor href in `markup` to an absolute URL against `base`.
///
/// Hrefs that cannot be joined are left as they were.
pub fn absolutize_links(markup: &str, base: &Url) -> String {
    ANCHOR_HREF
        .replace_all(markup, |caps: &Captures| {
            let href = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            let absolute = base
                .join(href.trim())
                .map(|url| url.to_string())
                .unwrap_or_else(|_| href.to_string());
            format!("{}\"{}\"", &caps[1], absolute)
        })
        .into_owned()
}
