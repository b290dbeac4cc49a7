use anyhow::{Context, Result};
use apod_scraper::{scrape_archive, Config, HttpFetcher, Store};
use clap::Parser;

/// Scrape the Astronomy Picture of the Day archive into SQLite
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {}

fn main() -> Result<()> {
    let _ = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::default();
    let mut store = Store::open(&config.database_path)
        .with_context(|| format!("Failed to open database {}", config.database_path))?;
    let fetcher = HttpFetcher::new(config.encoding);

    scrape_archive(&config, &fetcher, &mut store).context("Scrape aborted")?;

    Ok(())
}
