//! SQLite container for the collection blobs.
//!
//! # Responsibility
//! - Open file or in-memory connections for `SqliteBlobStore`.
//! - Create the `blobs` table on first open and stamp the file version.
//! - Refuse files that are newer than this binary or whose `blobs` table
//!   lacks a column the store writes.
//!
//! # Invariants
//! - Returned connections have `PRAGMA user_version = SCHEMA_VERSION`.
//! - Returned connections have a `blobs(key, value, updated_at)` table.

use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::{Duration, Instant};

/// Layout version stamped into `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const BLOB_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];
const CREATE_BLOBS_SQL: &str = "CREATE TABLE IF NOT EXISTS blobs (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was stamped by a newer binary; it is left untouched.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// The `blobs` table exists but cannot hold snapshots.
    MalformedBlobTable { missing_column: &'static str },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "blob file version {found} is newer than supported {supported}"
            ),
            Self::MalformedBlobTable { missing_column } => {
                write!(f, "blobs table has no `{missing_column}` column")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Opens (or creates) a blob file.
///
/// # Side effects
/// - Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory blob database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

/// Reads the version stamp of an open connection.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect().map_err(DbError::from).and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        ensure_blob_schema(&mut conn)?;
        Ok(conn)
    });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn ensure_blob_schema(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    if found < SCHEMA_VERSION {
        let tx = conn.transaction()?;
        tx.execute_batch(CREATE_BLOBS_SQL)?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;
        info!("event=db_schema module=db status=created from={found} to={SCHEMA_VERSION}");
    }

    check_blob_columns(conn)
}

fn check_blob_columns(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('blobs');")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    match BLOB_COLUMNS
        .into_iter()
        .find(|required| !columns.iter().any(|column| column.as_str() == *required))
    {
        Some(missing_column) => Err(DbError::MalformedBlobTable { missing_column }),
        None => Ok(()),
    }
}
