use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use apod_scraper::{Config, EntryPage, Fetch, HttpFetcher};
use clap::Parser;
use url::Url;

/// Save an entry page as a regression fixture and show what gets extracted from it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Entry page URL, e.g. https://apod.nasa.gov/apod/ap200101.html
    url: String,

    /// Fixture name, saved as src/tests/fixtures/failures/<NAME>.html
    name: String,

    /// Index title of the entry, used to locate the credit
    #[arg(long, default_value = "")]
    title: String,

    /// Entry date as YYYY-MM-DD, copied into the printed record
    #[arg(long, default_value = "")]
    date: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::default();
    let base = Url::parse(&config.base_path).context("Invalid base path")?;
    let fetcher = HttpFetcher::new(config.encoding);

    println!("Fetching HTML from {}...", cli.url);
    let html = fetcher.fetch(&cli.url)?;

    let failures_dir = Path::new("src/tests/fixtures/failures");
    fs::create_dir_all(failures_dir).context("Failed to create failures directory")?;

    let file_path = failures_dir.join(format!("{}.html", cli.name));
    fs::write(&file_path, &html).context("Failed to write HTML file")?;
    println!("Saved HTML to {} for regression testing", file_path.display());

    let page = EntryPage::parse(&html, &base);
    let record = page.record(&cli.url, cli.date.clone(), &cli.title, &base);
    let pretty = serde_json::to_string_pretty(&record).context("Failed to serialize record")?;
    println!("\nExtracted record:\n{}", pretty);

    if !record.has_media() {
        println!("\nNo picture or video found; this entry would not be saved.");
    }

    Ok(())
}
