use encoding_rs::Encoding;

/// Root of the archive. Entry hrefs and image links are resolved against it.
pub const BASE_PATH: &str = "https://apod.nasa.gov/apod/";

pub const ARCHIVE_FILENAME: &str = "archivepix.html";

/// The archive predates UTF-8 and is served as windows-1252.
pub static SITE_ENCODING: &Encoding = encoding_rs::WINDOWS_1252;

// Change this when the extraction rules change. Every entry will be re-scraped.
pub const DATA_VERSION: &str = "1.1.1";

pub const DATABASE_PATH: &str = "scraperwiki.sqlite";

pub const ENTRIES_TABLE: &str = "swdata";
pub const VERSIONS_TABLE: &str = "data_versions";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_path: String,
    pub archive_filename: String,
    pub encoding: &'static Encoding,
    pub data_version: String,
    pub database_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_path: BASE_PATH.to_string(),
            archive_filename: ARCHIVE_FILENAME.to_string(),
            encoding: SITE_ENCODING,
            data_version: DATA_VERSION.to_string(),
            database_path: DATABASE_PATH.to_string(),
        }
    }
}

impl Config {
    pub fn archive_url(&self) -> String {
        format!("{}{}", self.base_path, self.archive_filename)
    }
}
