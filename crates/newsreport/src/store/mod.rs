use std::path::Path;

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OpenFlags};

use crate::models::{Article, Author, DayStatusCount, PathHits};
use crate::utils::time::MILLIS_PER_DAY;

pub const AUTHORS_TABLE: &str = "authors";
pub const ARTICLES_TABLE: &str = "articles";
pub const LOG_TABLE: &str = "log";

const CREATE_AUTHORS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS authors (
    id INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL
);
"#;

const CREATE_ARTICLES_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    slug TEXT NOT NULL PRIMARY KEY,
    title TEXT NOT NULL,
    author INTEGER NOT NULL REFERENCES authors(id)
);
"#;

const CREATE_LOG_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS log (
    path TEXT NOT NULL,
    status TEXT NOT NULL,
    time_unix_ms INTEGER NOT NULL,
    CHECK (time_unix_ms >= 0)
);
"#;

const CREATE_INDEX_LOG_PATH_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_log_path ON log (path);
"#;

const CREATE_INDEX_LOG_TIME_STATUS_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_log_time_status ON log (time_unix_ms, status);
"#;

#[must_use]
pub fn schema_statements() -> &'static [&'static str] {
    &[
        CREATE_AUTHORS_TABLE_SQL,
        CREATE_ARTICLES_TABLE_SQL,
        CREATE_LOG_TABLE_SQL,
        CREATE_INDEX_LOG_PATH_SQL,
        CREATE_INDEX_LOG_TIME_STATUS_SQL,
    ]
}

/// Creates the expected tables on a connection. Schema ownership belongs to
/// the external database service; this exists so tests and fixtures can seed
/// a store without it.
pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(&schema_statements().join("\n"))
        .context("failed to create log store schema")
}

/// Read-only handle over the news log store, acquired once per report run
/// and released on drop. Every report operation borrows it explicitly;
/// nothing holds a connection as ambient state.
#[derive(Debug)]
pub struct LogStore {
    connection: Connection,
}

impl LogStore {
    /// Opens the database file read-only and verifies the expected tables
    /// exist, so a missing or unprepared store fails loudly instead of
    /// producing empty reports.
    pub fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open log store database: {}", path.display()))?;
        Self::from_connection(connection)
    }

    /// Wraps an already-open connection (in-memory stores, tests) after the
    /// same table verification as [`LogStore::open`].
    pub fn from_connection(connection: Connection) -> Result<Self> {
        verify_expected_tables(&connection)?;
        Ok(Self { connection })
    }

    pub fn authors(&self) -> Result<Vec<Author>> {
        let query = format!("SELECT id, name FROM {AUTHORS_TABLE} ORDER BY id");
        let mut statement = self
            .connection
            .prepare(&query)
            .context("failed to prepare authors query")?;
        let rows = statement
            .query_map([], |row| {
                Ok(Author {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .context("failed to execute authors query")?;

        let mut authors = Vec::new();
        for row in rows {
            authors.push(row.context("failed to decode author row")?);
        }
        Ok(authors)
    }

    pub fn articles(&self) -> Result<Vec<Article>> {
        let query = format!("SELECT slug, title, author FROM {ARTICLES_TABLE} ORDER BY slug");
        let mut statement = self
            .connection
            .prepare(&query)
            .context("failed to prepare articles query")?;
        let rows = statement
            .query_map([], |row| {
                Ok(Article {
                    slug: row.get(0)?,
                    title: row.get(1)?,
                    author_id: row.get(2)?,
                })
            })
            .context("failed to execute articles query")?;

        let mut articles = Vec::new();
        for row in rows {
            articles.push(row.context("failed to decode article row")?);
        }
        Ok(articles)
    }

    /// Request count per distinct path over the whole log.
    pub fn path_hits(&self) -> Result<Vec<PathHits>> {
        let query =
            format!("SELECT path, COUNT(*) FROM {LOG_TABLE} GROUP BY path ORDER BY path");
        let mut statement = self
            .connection
            .prepare(&query)
            .context("failed to prepare path hits query")?;
        let rows = statement
            .query_map([], |row| {
                Ok((row.get::<usize, String>(0)?, row.get::<usize, i64>(1)?))
            })
            .context("failed to execute path hits query")?;

        let mut hits = Vec::new();
        for row in rows {
            let (path, count) = row.context("failed to decode path hits row")?;
            hits.push(PathHits {
                path,
                hits: non_negative_count(count)?,
            });
        }
        Ok(hits)
    }

    /// Request count per (UTC calendar day, status line). Day truncation is
    /// exact integer division of the non-negative millisecond timestamp.
    pub fn daily_status_counts(&self) -> Result<Vec<DayStatusCount>> {
        let query = format!(
            "SELECT time_unix_ms / {MILLIS_PER_DAY} AS unix_day, status, COUNT(*) \
             FROM {LOG_TABLE} GROUP BY unix_day, status ORDER BY unix_day, status"
        );
        let mut statement = self
            .connection
            .prepare(&query)
            .context("failed to prepare daily status counts query")?;
        let rows = statement
            .query_map([], |row| {
                Ok((
                    row.get::<usize, i64>(0)?,
                    row.get::<usize, String>(1)?,
                    row.get::<usize, i64>(2)?,
                ))
            })
            .context("failed to execute daily status counts query")?;

        let mut counts = Vec::new();
        for row in rows {
            let (unix_day, status, count) = row.context("failed to decode daily status row")?;
            counts.push(DayStatusCount {
                unix_day,
                status,
                count: non_negative_count(count)?,
            });
        }
        Ok(counts)
    }
}

fn non_negative_count(count: i64) -> Result<u64> {
    u64::try_from(count).map_err(|_| anyhow::anyhow!("log store returned a negative count"))
}

fn verify_expected_tables(connection: &Connection) -> Result<()> {
    for table in [AUTHORS_TABLE, ARTICLES_TABLE, LOG_TABLE] {
        let exists = connection
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [table],
                |row| row.get::<usize, i64>(0),
            )
            .context("failed to inspect log store schema")?;
        if exists == 0 {
            bail!("log store is missing expected table `{table}`");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{LogStore, ensure_schema};
    use rusqlite::{Connection, params};

    fn seeded_connection() -> Connection {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_schema(&connection).expect("schema creation should succeed");
        connection
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let connection = seeded_connection();
        ensure_schema(&connection).expect("second schema ensure should succeed");
        LogStore::from_connection(connection).expect("verified store should open");
    }

    #[test]
    fn from_connection_rejects_missing_tables() {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        connection
            .execute("CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT NOT NULL)", [])
            .expect("partial schema should be creatable");

        let error = LogStore::from_connection(connection)
            .expect_err("store without articles/log tables must be rejected");
        assert!(
            error.to_string().contains("missing expected table"),
            "unexpected error: {error}"
        );
    }

    #[test]
    fn path_hits_aggregates_per_path() {
        let connection = seeded_connection();
        for path in ["/article/a", "/article/a", "/about"] {
            connection
                .execute(
                    "INSERT INTO log (path, status, time_unix_ms) VALUES (?1, '200 OK', 0)",
                    [path],
                )
                .expect("log row should insert");
        }

        let store = LogStore::from_connection(connection).expect("store should open");
        let hits = store.path_hits().expect("path hits should aggregate");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].path, "/about");
        assert_eq!(hits[0].hits, 1);
        assert_eq!(hits[1].path, "/article/a");
        assert_eq!(hits[1].hits, 2);
    }

    #[test]
    fn daily_status_counts_truncate_to_utc_days() {
        let connection = seeded_connection();
        let day = 16_999i64; // 2016-07-17
        let rows = [
            (day * 86_400_000, "200 OK"),
            (day * 86_400_000 + 86_399_999, "200 OK"),
            (day * 86_400_000 + 42, "404 NOT FOUND"),
            ((day + 1) * 86_400_000, "200 OK"),
        ];
        for (time_unix_ms, status) in rows {
            connection
                .execute(
                    "INSERT INTO log (path, status, time_unix_ms) VALUES ('/x', ?1, ?2)",
                    params![status, time_unix_ms],
                )
                .expect("log row should insert");
        }

        let store = LogStore::from_connection(connection).expect("store should open");
        let counts = store
            .daily_status_counts()
            .expect("daily counts should aggregate");
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0].unix_day, day);
        assert_eq!(counts[0].status, "200 OK");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].unix_day, day);
        assert_eq!(counts[1].status, "404 NOT FOUND");
        assert_eq!(counts[1].count, 1);
        assert_eq!(counts[2].unix_day, day + 1);
        assert_eq!(counts[2].count, 1);
    }
}
