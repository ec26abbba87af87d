//! Shared record identity and field helpers.
//!
//! # Responsibility
//! - Define the `RecordId` newtype and its generator.
//! - Provide the `Record` trait the store uses for generic collection handling.
//! - Provide the presence check used by form-level callers.
//!
//! # Invariants
//! - Generated ids are never checked against existing ids; collisions are
//!   accepted as negligible (122 random bits).
//! - `RecordId` serializes as a bare JSON string.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Identifier of one record inside its own collection.
///
/// Seeded records use short fixed ids (`s1`, `e1`, ...); generated records use
/// the simple (hyphen-less) form of a random UUID.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wraps an existing identifier verbatim.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Produces a fresh identifier, independent of any collection content.
pub fn generate_id() -> RecordId {
    RecordId(Uuid::new_v4().simple().to_string())
}

/// Common surface of School/Employee/Student records.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Blob-store key under which the whole collection is persisted.
    const COLLECTION: &'static str;

    fn id(&self) -> &RecordId;
}

/// Required-field presence failure raised by form-level callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    MissingField(&'static str),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
        }
    }
}

impl Error for RecordValidationError {}

/// Trims `value` and rejects it when nothing is left.
///
/// The store never calls this; it exists for FFI/CLI form submission paths.
pub fn require_field(
    field: &'static str,
    value: &str,
) -> Result<String, RecordValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Maps optional form input to a weak school reference.
///
/// Blank input (the "choose a school" placeholder) means no reference.
pub fn optional_reference(value: Option<&str>) -> Option<RecordId> {
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(RecordId::new)
}
