//! Firefox `places.sqlite` export.

use std::collections::HashMap;
use std::path::Path;

use chrono::DateTime;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, warn};

use crate::Result;
use crate::event::BrowserRecord;

const VISITS_QUERY: &str = r"
    SELECT moz_places.url, moz_places.title, moz_places.visit_count,
           moz_historyvisits.visit_date
    FROM moz_places
    JOIN moz_historyvisits ON moz_places.id = moz_historyvisits.place_id
    WHERE moz_places.url NOT NULL
    ORDER BY moz_historyvisits.visit_date ASC
";

/// Opens a Firefox history database read-only and exports its visits.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried.
pub async fn import_history(path: &Path) -> Result<Vec<BrowserRecord>> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    let records = history_from_pool(&pool).await;
    pool.close().await;

    let records = records?;
    info!(path = %path.display(), pages = records.len(), "Imported browser history");
    Ok(records)
}

/// Groups every visit by URL, in order of first visit.
///
/// The first dated row seen for a URL supplies its title and visit count.
/// Visit dates are microseconds since the Unix epoch; rows without a
/// usable date are skipped, so a page with no dated visit is left out.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn history_from_pool(pool: &SqlitePool) -> Result<Vec<BrowserRecord>> {
    let rows = sqlx::query(VISITS_QUERY).fetch_all(pool).await?;
    debug!(rows = rows.len(), "Fetched history rows");

    let mut records: Vec<BrowserRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in &rows {
        let url: String = row.try_get("url")?;
        let visit_date: Option<i64> = row.try_get("visit_date")?;
        let Some(instant) = visit_date.and_then(DateTime::from_timestamp_micros) else {
            warn!(%url, ?visit_date, "Skipping visit with invalid date");
            continue;
        };

        let slot = match index.get(&url) {
            Some(&slot) => slot,
            None => {
                let title: Option<String> = row.try_get("title")?;
                let visit_count: Option<i64> = row.try_get("visit_count")?;
                records.push(BrowserRecord {
                    title: title.unwrap_or_default(),
                    url: url.clone(),
                    visit_count: visit_count
                        .and_then(|n| u64::try_from(n).ok())
                        .unwrap_or_default(),
                    timestamps: Vec::new(),
                });
                index.insert(url, records.len() - 1);
                records.len() - 1
            }
        };
        records[slot].timestamps.push(instant);
    }

    Ok(records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    async fn places() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            r"
            CREATE TABLE moz_places (
                id INTEGER PRIMARY KEY,
                url TEXT,
                title TEXT,
                visit_count INTEGER DEFAULT 0
            )
            ",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            r"
            CREATE TABLE moz_historyvisits (
                id INTEGER PRIMARY KEY,
                place_id INTEGER,
                visit_date INTEGER
            )
            ",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    fn micros(day: u32) -> i64 {
        Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0)
            .unwrap()
            .timestamp_micros()
    }

    #[tokio::test]
    async fn test_groups_visits_by_url() {
        let pool = places().await;
        sqlx::query(
            "INSERT INTO moz_places (id, url, title, visit_count) VALUES
                (1, 'https://a.example', 'A', 2),
                (2, 'https://b.example', NULL, 1),
                (3, NULL, 'orphan', 1)",
        )
        .execute(&pool)
        .await
        .unwrap();

        for (place, day) in [(1, 3), (2, 2), (1, 1), (3, 4)] {
            sqlx::query("INSERT INTO moz_historyvisits (place_id, visit_date) VALUES (?, ?)")
                .bind(place)
                .bind(micros(day))
                .execute(&pool)
                .await
                .unwrap();
        }

        let records = history_from_pool(&pool).await.unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].url, "https://a.example");
        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].visit_count, 2);
        assert_eq!(
            records[0].timestamps,
            vec![
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap(),
            ]
        );

        assert_eq!(records[1].url, "https://b.example");
        assert_eq!(records[1].title, "");
        assert_eq!(records[1].timestamps.len(), 1);
    }

    #[tokio::test]
    async fn test_undated_visits_are_dropped() {
        let pool = places().await;
        sqlx::query(
            "INSERT INTO moz_places (id, url, title, visit_count) VALUES
                (1, 'https://undated.example', 'U', 1),
                (2, 'https://mixed.example', 'M', 2)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO moz_historyvisits (place_id, visit_date) VALUES
                (1, NULL), (2, NULL), (2, ?)",
        )
        .bind(micros(6))
        .execute(&pool)
        .await
        .unwrap();

        let records = history_from_pool(&pool).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://mixed.example");
        assert_eq!(records[0].title, "M");
        assert_eq!(
            records[0].timestamps,
            vec![Utc.with_ymd_and_hms(2023, 1, 6, 0, 0, 0).unwrap()]
        );
    }

    #[tokio::test]
    async fn test_export_round_trips_through_loader() {
        let pool = places().await;
        sqlx::query("INSERT INTO moz_places (id, url, title, visit_count) VALUES (1, 'https://a.example', 'A', 1)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO moz_historyvisits (place_id, visit_date) VALUES (1, ?)")
            .bind(micros(5))
            .execute(&pool)
            .await
            .unwrap();

        let records = history_from_pool(&pool).await.unwrap();
        let json = serde_json::to_string(&records).unwrap();
        let report = crate::loader::parse_history(&json).unwrap();

        assert_eq!(report.batch, crate::loader::Batch::History(records));
    }

    #[tokio::test]
    async fn test_missing_database_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(import_history(&dir.path().join("places.sqlite")).await.is_err());
    }
}
