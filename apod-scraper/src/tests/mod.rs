use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::config::Config;
use crate::error::FetchError;
use crate::fetch::Fetch;

pub mod fixtures;
pub mod run_tests;

/// Serves fixture pages by URL and counts requests. Unknown URLs are a 404.
#[derive(Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, String>,
    requests: Cell<usize>,
    requested: RefCell<Vec<String>>,
}

impl FixtureFetcher {
    pub fn with_page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Fetch for FixtureFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.set(self.requests.get() + 1);
        self.requested.borrow_mut().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        })
    }
}

/// The sample archive with every entry page that exists for it.
pub fn sample_site() -> FixtureFetcher {
    let base = Config::default().base_path;
    FixtureFetcher::default()
        .with_page(
            &format!("{}archivepix.html", base),
            fixtures::load_html_fixture("archivepix"),
        )
        .with_page(
            &format!("{}ap200101.html", base),
            fixtures::load_html_fixture("ap200101"),
        )
        .with_page(
            &format!("{}ap200102.html", base),
            fixtures::load_html_fixture("ap200102"),
        )
        .with_page(
            &format!("{}ap200103.html", base),
            fixtures::load_html_fixture("ap200103"),
        )
        .with_page(
            &format!("{}ap191231.html", base),
            fixtures::load_html_fixture("ap191231"),
        )
}
