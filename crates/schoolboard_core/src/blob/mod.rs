//! Key-value blob store abstraction used for snapshot persistence.
//!
//! # Responsibility
//! - Define the get/set-by-name contract the record store persists through.
//! - Keep storage medium details (SQLite, memory) behind one trait.
//!
//! # Invariants
//! - `get` of a never-written key returns `Ok(None)`, not an error.
//! - `set` overwrites any previous value for the key.
//! - `set_batch` writes every entry or reports an error; backends that can
//!   make it atomic do so.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;

pub type BlobResult<T> = Result<T, BlobError>;

/// Storage-medium failure surfaced by a blob store backend.
#[derive(Debug)]
pub enum BlobError {
    Db(DbError),
    /// Connection was not opened through `db::open_db*`.
    MissingRequiredTable(&'static str),
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "blob storage is not ready: missing table `{table}`")
            }
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for BlobError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BlobError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named text blob persistence.
pub trait BlobStore {
    /// Reads the blob stored under `key`.
    fn get(&self, key: &str) -> BlobResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous blob.
    fn set(&mut self, key: &str, value: &str) -> BlobResult<()>;

    /// Stores several blobs. Default implementation writes them one by one.
    fn set_batch(&mut self, entries: &[(&str, String)]) -> BlobResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl<B: BlobStore + ?Sized> BlobStore for &mut B {
    fn get(&self, key: &str) -> BlobResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> BlobResult<()> {
        (**self).set(key, value)
    }

    fn set_batch(&mut self, entries: &[(&str, String)]) -> BlobResult<()> {
        (**self).set_batch(entries)
    }
}
