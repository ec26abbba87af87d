//! Read-side projections consumed by rendering collaborators.

use crate::model::record::RecordId;
use crate::model::staff::{Employee, Student};
use std::fmt::{Display, Formatter};

/// Display label for a school reference that does not resolve ("unspecified").
pub const UNRESOLVED_SCHOOL_LABEL: &str = "غير محدد";

/// Outcome of resolving a weak `school_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchoolName<'a> {
    Resolved(&'a str),
    /// No school with that id exists (deleted, never existed, or no id set).
    Unresolved,
}

impl<'a> SchoolName<'a> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Resolved name, or `fallback` for an unresolved reference.
    pub fn or<'b>(self, fallback: &'b str) -> &'b str
    where
        'a: 'b,
    {
        match self {
            Self::Resolved(name) => name,
            Self::Unresolved => fallback,
        }
    }

    /// Resolved name, or `UNRESOLVED_SCHOOL_LABEL`.
    pub fn label(self) -> &'a str {
        self.or(UNRESOLVED_SCHOOL_LABEL)
    }
}

impl Display for SchoolName<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub schools: usize,
    pub employees: usize,
    pub students: usize,
}

/// One entry of a school picker, in stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolOption {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeRow<'a> {
    pub employee: &'a Employee,
    pub school: SchoolName<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentRow<'a> {
    pub student: &'a Student,
    pub school: SchoolName<'a>,
}
