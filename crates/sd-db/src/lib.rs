//! Storage layer for the sleep diary.
//!
//! Provides persistence for day records, naps, and symptom notes using
//! `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. A `Database` instance can be moved between threads but cannot
//! be shared across threads without external synchronization. Each incoming
//! user action is handled to completion before the next; there is no
//! background processing.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in ISO 8601 format (`2025-11-08T23:30:00`)
//! and dates as `YYYY-MM-DD`, so lexicographic ordering matches chronological
//! ordering. Timestamps are naive local times; the diary does no timezone
//! handling.
//!
//! One `days` row exists per (user, date), enforced by a uniqueness
//! constraint. Every write path runs as a single transaction so a reader
//! never observes a half-updated day (e.g., a new sleep time with a stale
//! duration).

use std::path::Path;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use thiserror::Error;

use sd_core::{DayRecord, DaySummary, Nap, Symptom, UserId};
use sd_core::time::{compute_duration, format_date, format_timestamp, parse_date, parse_timestamp};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored timestamp could not be parsed.
    #[error("invalid stored timestamp in {table}: {value}")]
    TimestampParse {
        table: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored date could not be parsed.
    #[error("invalid stored date in {table}: {value}")]
    DateParse {
        table: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Broad classification of a storage failure.
///
/// Lets callers distinguish retryable conditions from terminal ones without
/// inspecting SQLite error codes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The storage backend is busy, locked, or unreachable; retrying later
    /// may succeed.
    PersistenceUnavailable,
    /// A schema constraint was violated; retrying the same write will fail
    /// again.
    ConstraintViolation,
    /// Anything else, including corrupt stored values.
    Unknown,
}

impl DbError {
    /// Classifies this error for retry decisions.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => match err.code {
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::DiskFull
                | ErrorCode::SystemIoFailure => FailureKind::PersistenceUnavailable,
                ErrorCode::ConstraintViolation => FailureKind::ConstraintViolation,
                _ => FailureKind::Unknown,
            },
            _ => FailureKind::Unknown,
        }
    }
}

/// One entry of the "days with any data" listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayListing {
    pub date: NaiveDate,
    /// True only when the day row itself has an endpoint or the no-sleep
    /// flag. A day with only naps or symptoms is listed but flagged false.
    pub has_primary_data: bool,
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                username TEXT NOT NULL DEFAULT '',
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );

            -- Days table: one canonical row per (user, date)
            -- sleep_at/wake_at: ISO 8601 naive timestamps
            -- total_sleep_minutes: NULL until both endpoints are present
            CREATE TABLE IF NOT EXISTS days (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                sleep_at TEXT,
                wake_at TEXT,
                total_sleep_minutes INTEGER,
                no_sleep INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(user_id),
                UNIQUE(user_id, date)
            );

            CREATE TABLE IF NOT EXISTS naps (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                sleep_at TEXT NOT NULL,
                wake_at TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(user_id)
            );

            CREATE INDEX IF NOT EXISTS idx_naps_user_date ON naps(user_id, date);

            CREATE TABLE IF NOT EXISTS symptoms (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                text TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(user_id)
            );

            CREATE INDEX IF NOT EXISTS idx_symptoms_user_date ON symptoms(user_id, date);
            ",
        )?;
        tracing::debug!("database schema initialized");
        Ok(())
    }

    /// Registers a user, replacing display attributes on repeat registration.
    ///
    /// Never fails on duplicates; the original creation time is kept.
    pub fn upsert_user(
        &mut self,
        user: UserId,
        username: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), DbError> {
        let now = format_timestamp(Local::now().naive_local());
        self.conn.execute(
            "
            INSERT INTO users (user_id, username, first_name, last_name, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name,
                last_name = excluded.last_name
            ",
            params![user.get(), username, first_name, last_name, now],
        )?;
        Ok(())
    }

    /// Records the primary sleep time for a date.
    ///
    /// Loads the existing day record, applies the reconciliation rules from
    /// [`sd_core::day`], and writes the result back in one transaction. An
    /// existing wake time is left untouched and the duration recomputed
    /// against it.
    pub fn record_primary_sleep(
        &mut self,
        user: UserId,
        sleep_at: NaiveDateTime,
        date: NaiveDate,
    ) -> Result<(), DbError> {
        self.reconcile_day(user, date, |record| record.apply_sleep(sleep_at))?;
        tracing::debug!(%user, %date, "recorded primary sleep");
        Ok(())
    }

    /// Records the primary wake time for a date.
    ///
    /// Symmetric to [`Self::record_primary_sleep`]; the midnight-crossing
    /// rule applies when recomputing the duration.
    pub fn record_primary_wake(
        &mut self,
        user: UserId,
        wake_at: NaiveDateTime,
        date: NaiveDate,
    ) -> Result<(), DbError> {
        self.reconcile_day(user, date, |record| record.apply_wake(wake_at))?;
        tracing::debug!(%user, %date, "recorded primary wake");
        Ok(())
    }

    /// Marks a date as sleepless, clearing any recorded endpoints.
    ///
    /// This is a destructive override regardless of prior state; the
    /// front-end is expected to warn before invoking it. Idempotent.
    pub fn record_no_sleep(&mut self, user: UserId, date: NaiveDate) -> Result<(), DbError> {
        self.reconcile_day(user, date, DayRecord::apply_no_sleep)?;
        tracing::debug!(%user, %date, "recorded no-sleep override");
        Ok(())
    }

    /// Loads, mutates, and upserts the day record inside one transaction.
    fn reconcile_day(
        &mut self,
        user: UserId,
        date: NaiveDate,
        apply: impl FnOnce(&mut DayRecord),
    ) -> Result<(), DbError> {
        let now = format_timestamp(Local::now().naive_local());
        let date_str = format_date(date);
        let tx = self.conn.transaction()?;
        ensure_user(&tx, user, &now)?;

        let mut record = load_day(&tx, user, &date_str)?.unwrap_or_default();
        apply(&mut record);

        tx.execute(
            "
            INSERT INTO days (user_id, date, sleep_at, wake_at, total_sleep_minutes, no_sleep, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, date) DO UPDATE SET
                sleep_at = excluded.sleep_at,
                wake_at = excluded.wake_at,
                total_sleep_minutes = excluded.total_sleep_minutes,
                no_sleep = excluded.no_sleep,
                updated_at = excluded.updated_at
            ",
            params![
                user.get(),
                date_str,
                record.sleep_at.map(format_timestamp),
                record.wake_at.map(format_timestamp),
                record.total_sleep_minutes,
                record.no_sleep,
                now,
                now,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Adds a supplementary nap with both endpoints known.
    ///
    /// The duration is computed once at creation with the shared
    /// midnight-crossing rule; naps are independent rows and never merged.
    /// Returns the new nap's ID.
    pub fn add_nap(
        &mut self,
        user: UserId,
        sleep_at: NaiveDateTime,
        wake_at: NaiveDateTime,
        date: NaiveDate,
    ) -> Result<i64, DbError> {
        let duration_minutes = compute_duration(sleep_at, wake_at);
        let now = format_timestamp(Local::now().naive_local());
        let tx = self.conn.transaction()?;
        ensure_user(&tx, user, &now)?;
        tx.execute(
            "
            INSERT INTO naps (user_id, date, sleep_at, wake_at, duration_minutes, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
            params![
                user.get(),
                format_date(date),
                format_timestamp(sleep_at),
                format_timestamp(wake_at),
                duration_minutes,
                now,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        tracing::debug!(%user, %date, id, duration_minutes, "added nap");
        Ok(id)
    }

    /// Adds a free-text symptom note. No deduplication. Returns the new ID.
    pub fn add_symptom(
        &mut self,
        user: UserId,
        text: &str,
        date: NaiveDate,
    ) -> Result<i64, DbError> {
        let now = format_timestamp(Local::now().naive_local());
        let tx = self.conn.transaction()?;
        ensure_user(&tx, user, &now)?;
        tx.execute(
            "INSERT INTO symptoms (user_id, date, text, created_at) VALUES (?, ?, ?, ?)",
            params![user.get(), format_date(date), text, now],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        tracing::debug!(%user, %date, id, "added symptom");
        Ok(id)
    }

    /// Deletes the day record and all naps and symptoms for the date, as
    /// one atomic unit. Other dates and users are untouched.
    pub fn delete_day(&mut self, user: UserId, date: NaiveDate) -> Result<(), DbError> {
        let date_str = format_date(date);
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM days WHERE user_id = ? AND date = ?",
            params![user.get(), date_str],
        )?;
        tx.execute(
            "DELETE FROM naps WHERE user_id = ? AND date = ?",
            params![user.get(), date_str],
        )?;
        tx.execute(
            "DELETE FROM symptoms WHERE user_id = ? AND date = ?",
            params![user.get(), date_str],
        )?;
        tx.commit()?;
        tracing::debug!(%user, %date, "deleted day");
        Ok(())
    }

    /// Deletes one symptom by ID. Returns whether a row was removed.
    ///
    /// The caller is trusted to have validated ownership; this is a known
    /// simplification, not a security boundary.
    pub fn delete_symptom(&mut self, id: i64) -> Result<bool, DbError> {
        let removed = self
            .conn
            .execute("DELETE FROM symptoms WHERE id = ?", params![id])?;
        Ok(removed > 0)
    }

    /// Deletes one nap by ID. Returns whether a row was removed.
    ///
    /// Same trusted-caller assumption as [`Self::delete_symptom`].
    pub fn delete_nap(&mut self, id: i64) -> Result<bool, DbError> {
        let removed = self
            .conn
            .execute("DELETE FROM naps WHERE id = ?", params![id])?;
        Ok(removed > 0)
    }

    /// Fetches the day record for a (user, date), if one exists.
    ///
    /// Used both for summaries and for the existing-data preview shown
    /// before destructive overwrites. Absence is not an error.
    pub fn lookup_day(&self, user: UserId, date: NaiveDate) -> Result<Option<DayRecord>, DbError> {
        load_day(&self.conn, user, &format_date(date))
    }

    /// Lists dates that have any data at all, newest first.
    ///
    /// The listing is the union of distinct dates across days, naps, and
    /// symptoms, capped at `limit`. `has_primary_data` distinguishes dates
    /// whose day row carries an endpoint or no-sleep flag from dates that
    /// only have naps or symptoms.
    pub fn list_days_with_any_data(
        &self,
        user: UserId,
        limit: u32,
    ) -> Result<Vec<DayListing>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT d.date,
                   EXISTS (
                       SELECT 1 FROM days
                       WHERE user_id = ?1 AND date = d.date
                         AND (sleep_at IS NOT NULL OR wake_at IS NOT NULL OR no_sleep = 1)
                   )
            FROM (
                SELECT date FROM days WHERE user_id = ?1
                UNION
                SELECT date FROM naps WHERE user_id = ?1
                UNION
                SELECT date FROM symptoms WHERE user_id = ?1
            ) d
            ORDER BY d.date DESC
            LIMIT ?2
            ",
        )?;
        let rows = stmt.query_map(params![user.get(), limit], |row| {
            let date: String = row.get(0)?;
            let has_primary_data: bool = row.get(1)?;
            Ok((date, has_primary_data))
        })?;
        let mut listings = Vec::new();
        for row in rows {
            let (date, has_primary_data) = row?;
            listings.push(DayListing {
                date: parse_stored_date("days", &date)?,
                has_primary_data,
            });
        }
        Ok(listings)
    }

    /// Builds the read-only summary of one diary day.
    ///
    /// A date with no data yields an empty summary, never a failure.
    pub fn day_summary(&self, user: UserId, date: NaiveDate) -> Result<DaySummary, DbError> {
        let date_str = format_date(date);
        let record = load_day(&self.conn, user, &date_str)?;

        let mut stmt = self.conn.prepare(
            "
            SELECT id, sleep_at, wake_at, duration_minutes
            FROM naps
            WHERE user_id = ? AND date = ?
            ORDER BY sleep_at ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map(params![user.get(), date_str], |row| {
            let id: i64 = row.get(0)?;
            let sleep_at: String = row.get(1)?;
            let wake_at: String = row.get(2)?;
            let duration_minutes: i64 = row.get(3)?;
            Ok((id, sleep_at, wake_at, duration_minutes))
        })?;
        let mut naps = Vec::new();
        for row in rows {
            let (id, sleep_at, wake_at, duration_minutes) = row?;
            naps.push(Nap {
                id,
                sleep_at: parse_stored_timestamp("naps", &sleep_at)?,
                wake_at: parse_stored_timestamp("naps", &wake_at)?,
                duration_minutes,
            });
        }

        let mut stmt = self.conn.prepare(
            "
            SELECT id, text
            FROM symptoms
            WHERE user_id = ? AND date = ?
            ORDER BY created_at ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map(params![user.get(), date_str], |row| {
            Ok(Symptom {
                id: row.get(0)?,
                text: row.get(1)?,
            })
        })?;
        let mut symptoms = Vec::new();
        for row in rows {
            symptoms.push(row?);
        }

        Ok(DaySummary::build(date, record, naps, symptoms))
    }

    /// Summaries for the last `n` calendar days, most recent first.
    ///
    /// Always yields exactly `n` entries; dates without data get an empty
    /// summary so callers can rely on fixed positional slots.
    pub fn recent_days(&self, user: UserId, n: u32) -> Result<Vec<DaySummary>, DbError> {
        self.recent_days_from(user, n, Local::now().date_naive())
    }

    fn recent_days_from(
        &self,
        user: UserId,
        n: u32,
        today: NaiveDate,
    ) -> Result<Vec<DaySummary>, DbError> {
        let mut summaries = Vec::with_capacity(n as usize);
        for i in 0..n {
            let date = today - Duration::days(i64::from(i));
            summaries.push(self.day_summary(user, date)?);
        }
        Ok(summaries)
    }
}

/// Creates the user row if missing, without clobbering display attributes.
fn ensure_user(conn: &Connection, user: UserId, now: &str) -> Result<(), DbError> {
    conn.execute(
        "INSERT OR IGNORE INTO users (user_id, created_at) VALUES (?, ?)",
        params![user.get(), now],
    )?;
    Ok(())
}

fn load_day(conn: &Connection, user: UserId, date_str: &str) -> Result<Option<DayRecord>, DbError> {
    let row = conn
        .query_row(
            "
            SELECT sleep_at, wake_at, total_sleep_minutes, no_sleep
            FROM days
            WHERE user_id = ? AND date = ?
            ",
            params![user.get(), date_str],
            |row| {
                let sleep_at: Option<String> = row.get(0)?;
                let wake_at: Option<String> = row.get(1)?;
                let total_sleep_minutes: Option<i64> = row.get(2)?;
                let no_sleep: bool = row.get(3)?;
                Ok((sleep_at, wake_at, total_sleep_minutes, no_sleep))
            },
        )
        .optional()?;

    let Some((sleep_at, wake_at, total_sleep_minutes, no_sleep)) = row else {
        return Ok(None);
    };
    Ok(Some(DayRecord {
        sleep_at: sleep_at
            .as_deref()
            .map(|value| parse_stored_timestamp("days", value))
            .transpose()?,
        wake_at: wake_at
            .as_deref()
            .map(|value| parse_stored_timestamp("days", value))
            .transpose()?,
        total_sleep_minutes,
        no_sleep,
    }))
}

fn parse_stored_timestamp(table: &'static str, value: &str) -> Result<NaiveDateTime, DbError> {
    parse_timestamp(value).map_err(|source| DbError::TimestampParse {
        table,
        value: value.to_string(),
        source,
    })
}

fn parse_stored_date(table: &'static str, value: &str) -> Result<NaiveDate, DbError> {
    parse_date(value).map_err(|source| DbError::DateParse {
        table,
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sd_core::DayState;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn open_on_disk_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("sd.db");
        drop(Database::open(&path).unwrap());
        // Re-opening runs init() again against the existing schema.
        assert!(Database::open(&path).is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().expect("open in-memory db");

        let days_columns = table_columns(&db.conn, "days");
        assert_eq!(
            days_columns,
            vec![
                "id",
                "user_id",
                "date",
                "sleep_at",
                "wake_at",
                "total_sleep_minutes",
                "no_sleep",
                "created_at",
                "updated_at",
            ]
        );

        let naps_columns = table_columns(&db.conn, "naps");
        assert_eq!(
            naps_columns,
            vec![
                "id",
                "user_id",
                "date",
                "sleep_at",
                "wake_at",
                "duration_minutes",
                "created_at",
            ]
        );

        let symptoms_columns = table_columns(&db.conn, "symptoms");
        assert_eq!(
            symptoms_columns,
            vec!["id", "user_id", "date", "text", "created_at"]
        );

        // UNIQUE(user_id, date) backs the one-row-per-day invariant.
        let unique_count: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_index_list('days') WHERE \"unique\" = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(unique_count, 1);
    }

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .expect("prepare table_info");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query table_info");
        rows.map(|row| row.expect("table_info row")).collect()
    }

    #[test]
    fn upsert_user_replaces_display_attributes() {
        let mut db = Database::open_in_memory().unwrap();
        db.upsert_user(user(1), "old", "Old", "Name").unwrap();
        db.upsert_user(user(1), "new", "New", "Name").unwrap();

        let (count, username): (i64, String) = db
            .conn
            .query_row(
                "SELECT COUNT(*), MAX(username) FROM users WHERE user_id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(username, "new");
    }

    #[test]
    fn sleep_then_wake_yields_complete_record() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        db.record_primary_sleep(user(1), ts("2025-11-08T23:30:00"), day)
            .unwrap();
        db.record_primary_wake(user(1), ts("2025-11-09T07:00:00"), day)
            .unwrap();

        let record = db.lookup_day(user(1), day).unwrap().unwrap();
        assert_eq!(record.state(), DayState::Complete);
        assert_eq!(record.total_sleep_minutes, Some(450));
    }

    #[test]
    fn wake_then_sleep_yields_identical_record() {
        let day = date("2025-11-08");

        let mut forward = Database::open_in_memory().unwrap();
        forward
            .record_primary_sleep(user(1), ts("2025-11-08T23:30:00"), day)
            .unwrap();
        forward
            .record_primary_wake(user(1), ts("2025-11-09T07:00:00"), day)
            .unwrap();

        let mut reversed = Database::open_in_memory().unwrap();
        reversed
            .record_primary_wake(user(1), ts("2025-11-09T07:00:00"), day)
            .unwrap();
        reversed
            .record_primary_sleep(user(1), ts("2025-11-08T23:30:00"), day)
            .unwrap();

        assert_eq!(
            forward.lookup_day(user(1), day).unwrap(),
            reversed.lookup_day(user(1), day).unwrap()
        );
    }

    #[test]
    fn back_dated_wake_never_persists_negative_duration() {
        // Full timestamps let a wake land days before its sleep; the
        // stored duration must clamp to zero, not go negative.
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        db.record_primary_sleep(user(1), ts("2025-11-10T23:00:00"), day)
            .unwrap();
        db.record_primary_wake(user(1), ts("2025-11-08T07:00:00"), day)
            .unwrap();

        let record = db.lookup_day(user(1), day).unwrap().unwrap();
        assert_eq!(record.state(), DayState::Complete);
        assert_eq!(record.total_sleep_minutes, Some(0));
    }

    #[test]
    fn wake_only_record_has_no_duration() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        db.record_primary_wake(user(1), ts("2025-11-08T07:00:00"), day)
            .unwrap();

        let record = db.lookup_day(user(1), day).unwrap().unwrap();
        assert_eq!(record.state(), DayState::WakeOnly);
        assert_eq!(record.total_sleep_minutes, None);
    }

    #[test]
    fn second_sleep_overwrites_and_recomputes_against_existing_wake() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        db.record_primary_sleep(user(1), ts("2025-11-08T23:30:00"), day)
            .unwrap();
        db.record_primary_wake(user(1), ts("2025-11-09T07:00:00"), day)
            .unwrap();
        db.record_primary_sleep(user(1), ts("2025-11-09T01:00:00"), day)
            .unwrap();

        let record = db.lookup_day(user(1), day).unwrap().unwrap();
        assert_eq!(record.sleep_at, Some(ts("2025-11-09T01:00:00")));
        assert_eq!(record.wake_at, Some(ts("2025-11-09T07:00:00")));
        assert_eq!(record.total_sleep_minutes, Some(360));

        let row_count: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM days", [], |row| row.get(0))
            .unwrap();
        assert_eq!(row_count, 1);
    }

    #[test]
    fn no_sleep_overrides_complete_record() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        db.record_primary_sleep(user(1), ts("2025-11-08T23:00:00"), day)
            .unwrap();
        db.record_primary_wake(user(1), ts("2025-11-09T07:00:00"), day)
            .unwrap();
        db.record_no_sleep(user(1), day).unwrap();

        let summary = db.day_summary(user(1), day).unwrap();
        assert!(summary.no_sleep);
        assert_eq!(summary.total_sleep_minutes, Some(0));
        assert_eq!(summary.sleep_at, None);
        assert_eq!(summary.wake_at, None);
    }

    #[test]
    fn no_sleep_is_idempotent_in_storage() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        db.record_no_sleep(user(1), day).unwrap();
        let once = db.lookup_day(user(1), day).unwrap();
        db.record_no_sleep(user(1), day).unwrap();
        let twice = db.lookup_day(user(1), day).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn sleep_after_no_sleep_clears_the_flag() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        db.record_no_sleep(user(1), day).unwrap();
        db.record_primary_sleep(user(1), ts("2025-11-08T23:00:00"), day)
            .unwrap();

        let record = db.lookup_day(user(1), day).unwrap().unwrap();
        assert_eq!(record.state(), DayState::SleepOnly);
    }

    #[test]
    fn nap_duration_uses_midnight_crossing_rule() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        let id = db
            .add_nap(
                user(1),
                ts("2025-11-08T23:30:00"),
                ts("2025-11-08T07:00:00"),
                day,
            )
            .unwrap();

        let summary = db.day_summary(user(1), day).unwrap();
        assert_eq!(summary.naps.len(), 1);
        assert_eq!(summary.naps[0].id, id);
        assert_eq!(summary.naps[0].duration_minutes, 450);
    }

    #[test]
    fn naps_are_independent_rows_ordered_by_sleep_time() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        db.add_nap(
            user(1),
            ts("2025-11-08T17:00:00"),
            ts("2025-11-08T17:20:00"),
            day,
        )
        .unwrap();
        db.add_nap(
            user(1),
            ts("2025-11-08T13:00:00"),
            ts("2025-11-08T13:45:00"),
            day,
        )
        .unwrap();

        let summary = db.day_summary(user(1), day).unwrap();
        assert_eq!(summary.naps.len(), 2);
        assert_eq!(summary.naps[0].sleep_at, ts("2025-11-08T13:00:00"));
        assert_eq!(summary.naps[1].sleep_at, ts("2025-11-08T17:00:00"));
    }

    #[test]
    fn combined_total_adds_primary_and_nap_minutes() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        db.record_primary_sleep(user(1), ts("2025-11-08T23:30:00"), day)
            .unwrap();
        db.record_primary_wake(user(1), ts("2025-11-09T07:00:00"), day)
            .unwrap();
        db.add_nap(
            user(1),
            ts("2025-11-08T13:00:00"),
            ts("2025-11-08T13:45:00"),
            day,
        )
        .unwrap();

        let summary = db.day_summary(user(1), day).unwrap();
        assert_eq!(summary.total_sleep_minutes, Some(450));
        assert_eq!(summary.total_all_minutes, 495);
    }

    #[test]
    fn symptoms_keep_insertion_order_and_allow_duplicates() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        db.add_symptom(user(1), "headache", day).unwrap();
        db.add_symptom(user(1), "dizzy", day).unwrap();
        db.add_symptom(user(1), "headache", day).unwrap();

        let summary = db.day_summary(user(1), day).unwrap();
        let texts: Vec<&str> = summary
            .symptoms
            .iter()
            .map(|symptom| symptom.text.as_str())
            .collect();
        assert_eq!(texts, vec!["headache", "dizzy", "headache"]);
    }

    #[test]
    fn delete_day_cascades_and_leaves_other_days_and_users() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        let other_day = date("2025-11-07");

        db.record_primary_sleep(user(1), ts("2025-11-08T23:00:00"), day)
            .unwrap();
        db.add_nap(
            user(1),
            ts("2025-11-08T13:00:00"),
            ts("2025-11-08T13:30:00"),
            day,
        )
        .unwrap();
        db.add_symptom(user(1), "headache", day).unwrap();
        db.add_symptom(user(1), "tired", other_day).unwrap();
        db.record_no_sleep(user(2), day).unwrap();

        db.delete_day(user(1), day).unwrap();

        assert!(db.lookup_day(user(1), day).unwrap().is_none());
        let summary = db.day_summary(user(1), day).unwrap();
        assert!(summary.is_empty());

        let other = db.day_summary(user(1), other_day).unwrap();
        assert_eq!(other.symptoms.len(), 1);
        assert!(db.lookup_day(user(2), day).unwrap().is_some());
    }

    #[test]
    fn delete_symptom_and_nap_by_id() {
        let mut db = Database::open_in_memory().unwrap();
        let day = date("2025-11-08");
        let symptom_id = db.add_symptom(user(1), "headache", day).unwrap();
        let nap_id = db
            .add_nap(
                user(1),
                ts("2025-11-08T13:00:00"),
                ts("2025-11-08T13:30:00"),
                day,
            )
            .unwrap();

        assert!(db.delete_symptom(symptom_id).unwrap());
        assert!(db.delete_nap(nap_id).unwrap());
        // Already gone: reported as not removed, not as an error.
        assert!(!db.delete_symptom(symptom_id).unwrap());
        assert!(!db.delete_nap(nap_id).unwrap());

        let summary = db.day_summary(user(1), day).unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn lookup_day_absent_is_none_not_error() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.lookup_day(user(1), date("2025-11-08")).unwrap().is_none());
    }

    #[test]
    fn list_days_flags_primary_data_and_orders_newest_first() {
        let mut db = Database::open_in_memory().unwrap();
        db.record_primary_sleep(user(1), ts("2025-11-08T23:00:00"), date("2025-11-08"))
            .unwrap();
        // Naps-only day: listed, but without primary data.
        db.add_nap(
            user(1),
            ts("2025-11-09T13:00:00"),
            ts("2025-11-09T13:30:00"),
            date("2025-11-09"),
        )
        .unwrap();
        db.add_symptom(user(1), "headache", date("2025-11-07"))
            .unwrap();

        let listings = db.list_days_with_any_data(user(1), 30).unwrap();
        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].date, date("2025-11-09"));
        assert!(!listings[0].has_primary_data);
        assert_eq!(listings[1].date, date("2025-11-08"));
        assert!(listings[1].has_primary_data);
        assert_eq!(listings[2].date, date("2025-11-07"));
        assert!(!listings[2].has_primary_data);
    }

    #[test]
    fn list_days_respects_limit() {
        let mut db = Database::open_in_memory().unwrap();
        for day in ["2025-11-05", "2025-11-06", "2025-11-07", "2025-11-08"] {
            db.record_no_sleep(user(1), date(day)).unwrap();
        }

        let listings = db.list_days_with_any_data(user(1), 2).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].date, date("2025-11-08"));
        assert_eq!(listings[1].date, date("2025-11-07"));
    }

    #[test]
    fn recent_days_always_yields_n_entries() {
        let db = Database::open_in_memory().unwrap();
        let today = date("2025-11-10");
        let summaries = db.recent_days_from(user(1), 3, today).unwrap();

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].date, date("2025-11-10"));
        assert_eq!(summaries[1].date, date("2025-11-09"));
        assert_eq!(summaries[2].date, date("2025-11-08"));
        assert!(summaries.iter().all(DaySummary::is_empty));
    }

    #[test]
    fn recent_days_mixes_data_and_empty_slots() {
        let mut db = Database::open_in_memory().unwrap();
        let today = date("2025-11-10");
        db.record_primary_sleep(user(1), ts("2025-11-09T23:00:00"), date("2025-11-09"))
            .unwrap();

        let summaries = db.recent_days_from(user(1), 3, today).unwrap();
        assert!(summaries[0].is_empty());
        assert_eq!(summaries[1].sleep_at, Some(ts("2025-11-09T23:00:00")));
        assert!(summaries[2].is_empty());
    }

    #[test]
    fn constraint_violation_is_classified() {
        let mut db = Database::open_in_memory().unwrap();
        db.upsert_user(user(1), "u", "Test", "User").unwrap();
        db.conn
            .execute(
                "INSERT INTO days (user_id, date, no_sleep, created_at, updated_at)
                 VALUES (1, '2025-11-08', 0, 'x', 'x')",
                [],
            )
            .unwrap();
        let err = db
            .conn
            .execute(
                "INSERT INTO days (user_id, date, no_sleep, created_at, updated_at)
                 VALUES (1, '2025-11-08', 0, 'x', 'x')",
                [],
            )
            .map_err(DbError::from)
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::ConstraintViolation);
    }

    #[test]
    fn corrupt_timestamp_is_classified_unknown() {
        let err = parse_stored_timestamp("days", "garbage").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Unknown);
    }
}
