//! School record.

use crate::model::record::{generate_id, Record, RecordId};
use serde::{Deserialize, Serialize};

/// Root entity referenced by employees and students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    /// Free-form category (for example boys/girls). Serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl School {
    /// Creates a school with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self::with_id(generate_id(), name, address, kind)
    }

    /// Creates a school with a caller-provided id (seed and import paths).
    pub fn with_id(
        id: RecordId,
        name: impl Into<String>,
        address: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            kind: kind.into(),
        }
    }
}

impl Record for School {
    const COLLECTION: &'static str = "schools";

    fn id(&self) -> &RecordId {
        &self.id
    }
}
