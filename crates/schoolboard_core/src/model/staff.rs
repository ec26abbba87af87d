//! Employee and student records.
//!
//! Both carry a weak `school_id` reference. Nothing here (or in the store)
//! checks that the referenced school exists, before or after a school delete.

use crate::model::record::{generate_id, Record, RecordId};
use serde::{Deserialize, Serialize};

/// Staff member attached (weakly) to a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: RecordId,
    pub name: String,
    pub role: String,
    /// Serialized as `schoolId`; `null` when no school was chosen.
    #[serde(rename = "schoolId", default)]
    pub school_id: Option<RecordId>,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        school_id: Option<RecordId>,
    ) -> Self {
        Self::with_id(generate_id(), name, role, school_id)
    }

    pub fn with_id(
        id: RecordId,
        name: impl Into<String>,
        role: impl Into<String>,
        school_id: Option<RecordId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role: role.into(),
            school_id,
        }
    }
}

impl Record for Employee {
    const COLLECTION: &'static str = "employees";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Enrolled student attached (weakly) to a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: RecordId,
    pub name: String,
    pub grade: String,
    /// Serialized as `schoolId`; `null` when no school was chosen.
    #[serde(rename = "schoolId", default)]
    pub school_id: Option<RecordId>,
}

impl Student {
    pub fn new(
        name: impl Into<String>,
        grade: impl Into<String>,
        school_id: Option<RecordId>,
    ) -> Self {
        Self::with_id(generate_id(), name, grade, school_id)
    }

    pub fn with_id(
        id: RecordId,
        name: impl Into<String>,
        grade: impl Into<String>,
        school_id: Option<RecordId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            grade: grade.into(),
            school_id,
        }
    }
}

impl Record for Student {
    const COLLECTION: &'static str = "students";

    fn id(&self) -> &RecordId {
        &self.id
    }
}
