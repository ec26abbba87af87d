//! The record store and its mutation/query operations.

use super::seed::{seed_employees, seed_schools, seed_students};
use super::snapshot::{encode_collection, load_collection, LoadReport};
use super::views::{DashboardStats, EmployeeRow, SchoolName, SchoolOption, StudentRow};
use super::StoreResult;
use crate::blob::BlobStore;
use crate::config::SnapshotRecovery;
use crate::model::record::{Record, RecordId};
use crate::model::school::School;
use crate::model::staff::{Employee, Student};
use log::{debug, error, info};
use std::time::Instant;

/// In-memory contents of all three collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collections {
    pub schools: Vec<School>,
    pub employees: Vec<Employee>,
    pub students: Vec<Student>,
}

/// Owns the three collections and keeps the blob store in sync with them.
///
/// Constructed explicitly and passed by reference; there is no shared
/// instance. Mutations take `&mut self`.
pub struct RecordStore<B: BlobStore> {
    blob: B,
    data: Collections,
    report: LoadReport,
    dirty: bool,
}

impl<B: BlobStore> RecordStore<B> {
    /// Loads every collection from `blob`, seeding the ones with no snapshot.
    ///
    /// # Errors
    /// - `StoreError::Blob` when the medium cannot be read.
    /// - `StoreError::MalformedSnapshot` under `SnapshotRecovery::Fail`.
    pub fn open(blob: B, recovery: SnapshotRecovery) -> StoreResult<Self> {
        let started_at = Instant::now();
        let (data, report) = Self::load_or_seed(&blob, recovery)?;
        let recovered = report.recovered_keys();

        info!(
            "event=store_open module=store status=ok schools={}:{} employees={}:{} students={}:{} duration_ms={}",
            data.schools.len(),
            report.schools.as_str(),
            data.employees.len(),
            report.employees.as_str(),
            data.students.len(),
            report.students.as_str(),
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            blob,
            data,
            report,
            // Rewrite recovered collections on the next persist.
            dirty: !recovered.is_empty(),
        })
    }

    /// Reads each collection key, falling back to its seed when absent.
    pub fn load_or_seed(
        blob: &B,
        recovery: SnapshotRecovery,
    ) -> StoreResult<(Collections, LoadReport)> {
        let (schools, schools_origin) = load_collection(blob, recovery, seed_schools)?;
        let (employees, employees_origin) = load_collection(blob, recovery, seed_employees)?;
        let (students, students_origin) = load_collection(blob, recovery, seed_students)?;

        Ok((
            Collections {
                schools,
                employees,
                students,
            },
            LoadReport {
                schools: schools_origin,
                employees: employees_origin,
                students: students_origin,
            },
        ))
    }

    /// Builds a store around given contents without reading `blob`.
    ///
    /// The store starts dirty: nothing has been written yet.
    pub fn with_collections(blob: B, data: Collections) -> Self {
        Self {
            blob,
            data,
            report: LoadReport::in_memory(),
            dirty: true,
        }
    }

    /// Tears the store down and hands back the blob store.
    pub fn into_blob(self) -> B {
        self.blob
    }

    pub fn blob(&self) -> &B {
        &self.blob
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Whether in-memory state is ahead of the last successful persist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn collections(&self) -> &Collections {
        &self.data
    }

    pub fn schools(&self) -> &[School] {
        &self.data.schools
    }

    pub fn employees(&self) -> &[Employee] {
        &self.data.employees
    }

    pub fn students(&self) -> &[Student] {
        &self.data.students
    }

    pub fn school(&self, id: &RecordId) -> Option<&School> {
        find_by_id(&self.data.schools, id)
    }

    pub fn employee(&self, id: &RecordId) -> Option<&Employee> {
        find_by_id(&self.data.employees, id)
    }

    pub fn student(&self, id: &RecordId) -> Option<&Student> {
        find_by_id(&self.data.students, id)
    }

    /// Fresh identifier; never checked against stored ids.
    pub fn generate_id() -> RecordId {
        crate::model::record::generate_id()
    }

    /// Appends a school and persists.
    pub fn add_school(
        &mut self,
        name: impl Into<String>,
        address: impl Into<String>,
        kind: impl Into<String>,
    ) -> School {
        let school = School::new(name, address, kind);
        self.data.schools.push(school.clone());
        self.after_mutation("add", School::COLLECTION, &school.id);
        school
    }

    /// Appends an employee and persists. `school_id` is stored unchecked.
    pub fn add_employee(
        &mut self,
        name: impl Into<String>,
        role: impl Into<String>,
        school_id: Option<RecordId>,
    ) -> Employee {
        let employee = Employee::new(name, role, school_id);
        self.data.employees.push(employee.clone());
        self.after_mutation("add", Employee::COLLECTION, &employee.id);
        employee
    }

    /// Appends a student and persists. `school_id` is stored unchecked.
    pub fn add_student(
        &mut self,
        name: impl Into<String>,
        grade: impl Into<String>,
        school_id: Option<RecordId>,
    ) -> Student {
        let student = Student::new(name, grade, school_id);
        self.data.students.push(student.clone());
        self.after_mutation("add", Student::COLLECTION, &student.id);
        student
    }

    /// Removes a school; employees and students keep their (now dangling)
    /// `school_id`. Returns whether a record was removed.
    ///
    /// Persists even when nothing matched.
    pub fn delete_school(&mut self, id: &RecordId) -> bool {
        let removed = remove_by_id(&mut self.data.schools, id);
        self.after_delete::<School>(id, removed);
        removed
    }

    pub fn delete_employee(&mut self, id: &RecordId) -> bool {
        let removed = remove_by_id(&mut self.data.employees, id);
        self.after_delete::<Employee>(id, removed);
        removed
    }

    pub fn delete_student(&mut self, id: &RecordId) -> bool {
        let removed = remove_by_id(&mut self.data.students, id);
        self.after_delete::<Student>(id, removed);
        removed
    }

    /// Name of the school with `school_id`, or `SchoolName::Unresolved`.
    pub fn resolve_school_name(&self, school_id: &RecordId) -> SchoolName<'_> {
        match self.school(school_id) {
            Some(school) => SchoolName::Resolved(school.name.as_str()),
            None => SchoolName::Unresolved,
        }
    }

    fn resolve_reference(&self, school_id: Option<&RecordId>) -> SchoolName<'_> {
        school_id.map_or(SchoolName::Unresolved, |id| self.resolve_school_name(id))
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            schools: self.data.schools.len(),
            employees: self.data.employees.len(),
            students: self.data.students.len(),
        }
    }

    pub fn school_options(&self) -> Vec<SchoolOption> {
        self.data
            .schools
            .iter()
            .map(|school| SchoolOption {
                id: school.id.clone(),
                name: school.name.clone(),
            })
            .collect()
    }

    pub fn employee_rows(&self) -> Vec<EmployeeRow<'_>> {
        self.data
            .employees
            .iter()
            .map(|employee| EmployeeRow {
                employee,
                school: self.resolve_reference(employee.school_id.as_ref()),
            })
            .collect()
    }

    pub fn student_rows(&self) -> Vec<StudentRow<'_>> {
        self.data
            .students
            .iter()
            .map(|student| StudentRow {
                student,
                school: self.resolve_reference(student.school_id.as_ref()),
            })
            .collect()
    }

    /// Writes all three collections, overwriting previous snapshots.
    pub fn persist(&mut self) -> StoreResult<()> {
        let started_at = Instant::now();
        let entries = [
            encode_collection(&self.data.schools)?,
            encode_collection(&self.data.employees)?,
            encode_collection(&self.data.students)?,
        ];
        let bytes: usize = entries.iter().map(|(_, json)| json.len()).sum();

        self.blob.set_batch(&entries)?;
        self.dirty = false;

        debug!(
            "event=store_persist module=store status=ok bytes={} duration_ms={}",
            bytes,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn after_delete<T: Record>(&mut self, id: &RecordId, removed: bool) {
        if !removed {
            debug!(
                "event=record_delete module=store status=absent collection={} id={}",
                T::COLLECTION,
                id
            );
        }
        self.after_mutation("delete", T::COLLECTION, id);
    }

    fn after_mutation(&mut self, op: &'static str, collection: &'static str, id: &RecordId) {
        // Mark first so a failed write leaves the store visibly dirty.
        self.dirty = true;
        match self.persist() {
            Ok(()) => info!(
                "event=record_{op} module=store status=ok collection={collection} id={id}"
            ),
            Err(err) => error!(
                "event=record_{op} module=store status=error collection={collection} id={id} error_code=persist_failed error={err}"
            ),
        }
    }
}

fn find_by_id<'a, T: Record>(records: &'a [T], id: &RecordId) -> Option<&'a T> {
    records.iter().find(|record| record.id() == id)
}

fn remove_by_id<T: Record>(records: &mut Vec<T>, id: &RecordId) -> bool {
    let before = records.len();
    records.retain(|record| record.id() != id);
    records.len() != before
}
