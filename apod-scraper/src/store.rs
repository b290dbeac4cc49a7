use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::config::{ENTRIES_TABLE, VERSIONS_TABLE};
use crate::entry::EntryRecord;
use crate::error::StoreError;

/// SQLite-backed entry storage: one row per entry url in the entries table,
/// and the extraction version it was scraped with in `data_versions`.
pub struct Store {
    db: Connection,
}

impl Store {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(db: Connection) -> Result<Self, StoreError> {
        db.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {ENTRIES_TABLE} (
                url TEXT PRIMARY KEY,
                date TEXT,
                title TEXT,
                credit TEXT,
                explanation TEXT,
                picture_thumbnail_url TEXT,
                picture_url TEXT,
                video_url TEXT
            );
            CREATE TABLE IF NOT EXISTS {VERSIONS_TABLE} (
                url TEXT PRIMARY KEY,
                data_version TEXT
            );"
        ))?;
        Ok(Self { db })
    }

    /// Whether `url` has to be (re-)scraped at `current_version`.
    pub fn needs_scrape(&self, url: &str, current_version: &str) -> Result<bool, StoreError> {
        Ok(self.data_version(url)?.as_deref() != Some(current_version))
    }

    pub fn data_version(&self, url: &str) -> Result<Option<String>, StoreError> {
        let version = self
            .db
            .query_row(
                &format!("SELECT data_version FROM {VERSIONS_TABLE} WHERE url = ?1 LIMIT 1"),
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(version)
    }

    /// Upsert the record and its version stamp together.
    pub fn save(&mut self, record: &EntryRecord, data_version: &str) -> Result<(), StoreError> {
        let tx = self.db.transaction()?;
        tx.execute(
            &format!(
                "INSERT INTO {ENTRIES_TABLE}
                    (url, date, title, credit, explanation,
                     picture_thumbnail_url, picture_url, video_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(url) DO UPDATE SET
                    date = excluded.date,
                    title = excluded.title,
                    credit = excluded.credit,
                    explanation = excluded.explanation,
                    picture_thumbnail_url = excluded.picture_thumbnail_url,
                    picture_url = excluded.picture_url,
                    video_url = excluded.video_url"
            ),
            params![
                record.url,
                record.date,
                record.title,
                record.credit,
                record.explanation,
                record.picture_thumbnail_url,
                record.picture_url,
                record.video_url,
            ],
        )?;
        tx.execute(
            &format!(
                "INSERT INTO {VERSIONS_TABLE} (url, data_version) VALUES (?1, ?2)
                 ON CONFLICT(url) DO UPDATE SET data_version = excluded.data_version"
            ),
            params![record.url, data_version],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn record(&self, url: &str) -> Result<Option<EntryRecord>, StoreError> {
        let record = self
            .db
            .query_row(
                &format!(
                    "SELECT url, date, title, credit, explanation,
                            picture_thumbnail_url, picture_url, video_url
                     FROM {ENTRIES_TABLE} WHERE url = ?1"
                ),
                params![url],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.db.query_row(
            &format!("SELECT COUNT(*) FROM {ENTRIES_TABLE}"),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn record_from_row(row: &Row) -> rusqlite::Result<EntryRecord> {
    Ok(EntryRecord {
        url: row.get(0)?,
        date: row.get(1)?,
        title: row.get(2)?,
        credit: row.get(3)?,
        explanation: row.get(4)?,
        picture_thumbnail_url: row.get(5)?,
        picture_url: row.get(6)?,
        video_url: row.get(7)?,
    })
}
