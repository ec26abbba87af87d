//! Core domain logic for SchoolBoard.
//! This crate is the single source of truth for the school/employee/student
//! dataset and how it is persisted.

pub mod blob;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod store;

pub use blob::{BlobError, BlobResult, BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use config::{ConfigError, SnapshotRecovery, StoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::record::{
    generate_id, optional_reference, require_field, Record, RecordId, RecordValidationError,
};
pub use model::school::School;
pub use model::staff::{Employee, Student};
pub use store::{
    CollectionOrigin, Collections, DashboardStats, EmployeeRow, LoadReport, RecordStore,
    SchoolName, SchoolOption, StoreError, StoreResult, StudentRow, UNRESOLVED_SCHOOL_LABEL,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
