//! Relational record store over three collections.
//!
//! # Responsibility
//! - Own `schools`, `employees` and `students` in insertion order.
//! - Persist every collection after every mutation.
//! - Resolve weak `school_id` references for display.
//!
//! # Invariants
//! - Deleting a school never touches employees or students.
//! - Add/delete never return errors; persistence failures are logged and
//!   leave the store dirty.
//! - A malformed snapshot is handled per `SnapshotRecovery`.

use crate::blob::BlobError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod record_store;
pub mod seed;
mod snapshot;
mod views;

pub use record_store::{Collections, RecordStore};
pub use snapshot::{CollectionOrigin, LoadReport};
pub use views::{
    DashboardStats, EmployeeRow, SchoolName, SchoolOption, StudentRow, UNRESOLVED_SCHOOL_LABEL,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Blob(BlobError),
    /// A stored snapshot exists but is not a valid record array.
    MalformedSnapshot {
        key: &'static str,
        source: serde_json::Error,
    },
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob(err) => write!(f, "{err}"),
            Self::MalformedSnapshot { key, source } => {
                write!(f, "malformed `{key}` snapshot: {source}")
            }
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Blob(err) => Some(err),
            Self::MalformedSnapshot { source, .. } | Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<BlobError> for StoreError {
    fn from(value: BlobError) -> Self {
        Self::Blob(value)
    }
}
