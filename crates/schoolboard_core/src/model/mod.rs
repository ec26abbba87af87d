//! Domain model for the school administration dataset.
//!
//! # Responsibility
//! - Define the three record shapes persisted by the store.
//! - Own identifier generation and the required-field helper used by forms.
//!
//! # Invariants
//! - Every record is identified by a `RecordId` unique within its collection.
//! - `school_id` on employees/students is a weak reference; it may dangle.

pub mod record;
pub mod school;
pub mod staff;
