use super::{fixtures, sample_site, FixtureFetcher};
use crate::config::Config;
use crate::error::RunError;
use crate::run::{scrape_archive, RunSummary};
use crate::store::Store;

#[test]
fn test_first_run_isolates_bad_entries() {
    let config = Config::default();
    let mut store = Store::open_in_memory().unwrap();

    let summary = scrape_archive(&config, &sample_site(), &mut store).unwrap();

    assert_eq!(
        summary,
        RunSummary {
            links: 6,
            saved: 2,
            // the second ap200101.html link was saved moments earlier
            up_to_date: 1,
            without_media: 1,
            // ap191231 has no date, ap191230 does not exist
            failed: 2,
        }
    );
    assert_eq!(store.count().unwrap(), 2);

    let betelgeuse = store
        .record("https://apod.nasa.gov/apod/ap200101.html")
        .unwrap()
        .unwrap();
    assert_eq!(betelgeuse.date, "2020-01-01");
    assert!(store
        .record("https://apod.nasa.gov/apod/ap200102.html")
        .unwrap()
        .is_none());
    assert_eq!(
        store
            .data_version("https://apod.nasa.gov/apod/ap200103.html")
            .unwrap()
            .as_deref(),
        Some(config.data_version.as_str())
    );
}

#[test]
fn test_rerun_skips_current_entries() {
    let config = Config::default();
    let mut store = Store::open_in_memory().unwrap();
    scrape_archive(&config, &sample_site(), &mut store).unwrap();

    let fetcher = sample_site();
    let summary = scrape_archive(&config, &fetcher, &mut store).unwrap();

    assert_eq!(summary.saved, 0);
    assert_eq!(summary.up_to_date, 3);
    assert!(!fetcher
        .requested()
        .contains(&"https://apod.nasa.gov/apod/ap200101.html".to_string()));
}

#[test]
fn test_version_bump_rescrapes_everything() {
    let mut store = Store::open_in_memory().unwrap();
    scrape_archive(&Config::default(), &sample_site(), &mut store).unwrap();

    let bumped = Config {
        data_version: "9.0.0".to_string(),
        ..Config::default()
    };
    let summary = scrape_archive(&bumped, &sample_site(), &mut store).unwrap();

    assert_eq!(summary.saved, 2);
    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(
        store
            .data_version("https://apod.nasa.gov/apod/ap200101.html")
            .unwrap()
            .as_deref(),
        Some("9.0.0")
    );
}

#[test]
fn test_missing_index_aborts() {
    let mut store = Store::open_in_memory().unwrap();
    let result = scrape_archive(&Config::default(), &FixtureFetcher::default(), &mut store);
    assert!(matches!(result, Err(RunError::Index(_))));
}

#[test]
fn test_custom_origin() {
    let config = Config {
        base_path: "http://mirror.test/apod/".to_string(),
        archive_filename: "index.html".to_string(),
        ..Config::default()
    };
    let fetcher = FixtureFetcher::default()
        .with_page(
            "http://mirror.test/apod/index.html",
            r#"<b>2020 January 01:  <a href="ap200101.html">Betelgeuse Imagined</a></b>"#
                .to_string(),
        )
        .with_page(
            "http://mirror.test/apod/ap200101.html",
            fixtures::load_html_fixture("ap200101"),
        );
    let mut store = Store::open_in_memory().unwrap();

    let summary = scrape_archive(&config, &fetcher, &mut store).unwrap();
    assert_eq!(summary.saved, 1);

    let record = store
        .record("http://mirror.test/apod/ap200101.html")
        .unwrap()
        .unwrap();
    assert_eq!(
        record.picture_url,
        "http://mirror.test/apod/image/2001/BetelgeuseImagined_EsoCalcada_2520.jpg"
    );
}

#[test]
fn test_invalid_base_path_keeps_parse_error() {
    let config = Config {
        base_path: "not a url".to_string(),
        ..Config::default()
    };
    let mut store = Store::open_in_memory().unwrap();

    let err = scrape_archive(&config, &sample_site(), &mut store).unwrap_err();
    assert!(matches!(
        err,
        RunError::BasePath {
            source: url::ParseError::RelativeUrlWithoutBase,
            ..
        }
    ));
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.to_string().contains("not a url"));
}
