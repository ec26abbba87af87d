//! FFI use-case API for the dashboard UI.
//!
//! # Responsibility
//! - Expose form-submission and list/stats calls to Dart via FRB.
//! - Perform form-level required-field checks before touching the store.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are returned as `ok=false` envelopes, never as errors.
//! - Store access is serialized process-wide; each call loads a fresh store.

use log::warn;
use schoolboard_core::db::open_db;
use schoolboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, optional_reference,
    ping as ping_inner, require_field, RecordId, RecordStore, SqliteBlobStore, StoreConfig,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static STORE_CONFIG: OnceLock<StoreConfig> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the database file used by every later call.
///
/// # FFI contract
/// - Must run before the first store call to take effect.
/// - Returns empty string on success, or a message when another location
///   is already in use.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = STORE_CONFIG.get_or_init(|| StoreConfig {
        db_path: requested.clone(),
        ..load_env_config()
    });
    if active.db_path == requested {
        String::new()
    } else {
        format!(
            "store already initialized at `{}`; refusing to switch to `{}`",
            active.db_path.display(),
            requested.display()
        )
    }
}

/// Generic action response envelope for form submissions and deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation took effect and was saved.
    pub ok: bool,
    /// Id of the created or targeted record.
    pub record_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, record_id: String) -> Self {
        Self {
            ok: true,
            record_id: Some(record_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolItem {
    pub id: String,
    pub name: String,
    pub address: String,
    pub school_type: String,
}

/// Employee row with its school already resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeItem {
    pub id: String,
    pub name: String,
    pub role: String,
    pub school_id: Option<String>,
    /// School name, or the "unspecified" label for dangling references.
    pub school_name: String,
    pub school_resolved: bool,
}

/// Student row with its school already resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentItem {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub school_id: Option<String>,
    pub school_name: String,
    pub school_resolved: bool,
}

/// Full dashboard snapshot: three lists plus counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardResponse {
    pub ok: bool,
    pub schools: Vec<SchoolItem>,
    pub employees: Vec<EmployeeItem>,
    pub students: Vec<StudentItem>,
    pub message: String,
}

/// One entry of the employee/student form's school picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolOptionItem {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchoolOptionsResponse {
    pub ok: bool,
    /// Schools in stored order.
    pub items: Vec<SchoolOptionItem>,
    pub message: String,
}

/// Dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsResponse {
    pub ok: bool,
    pub schools: u32,
    pub employees: u32,
    pub students: u32,
    pub message: String,
}

/// Creates a school from the school form.
///
/// # FFI contract
/// - All three fields are required (non-blank after trim).
/// - Returns created record id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn school_add(name: String, address: String, school_type: String) -> ActionResponse {
    let fields = require_field("name", &name).and_then(|name| {
        Ok((
            name,
            require_field("address", &address)?,
            require_field("type", &school_type)?,
        ))
    });
    let (name, address, kind) = match fields {
        Ok(fields) => fields,
        Err(err) => return ActionResponse::failure(format!("school_add failed: {err}")),
    };

    mutate("school_add", "School created.", |store| {
        store.add_school(name, address, kind).id
    })
}

/// Creates an employee from the employee form.
///
/// # FFI contract
/// - `name` and `role` are required; blank `school_id` means no school.
/// - `school_id` is not checked against existing schools.
#[flutter_rust_bridge::frb(sync)]
pub fn employee_add(name: String, role: String, school_id: Option<String>) -> ActionResponse {
    let fields = require_field("name", &name)
        .and_then(|name| Ok((name, require_field("role", &role)?)));
    let (name, role) = match fields {
        Ok(fields) => fields,
        Err(err) => return ActionResponse::failure(format!("employee_add failed: {err}")),
    };
    let school_id = optional_reference(school_id.as_deref());

    mutate("employee_add", "Employee created.", |store| {
        store.add_employee(name, role, school_id).id
    })
}

/// Creates a student from the student form.
#[flutter_rust_bridge::frb(sync)]
pub fn student_add(name: String, grade: String, school_id: Option<String>) -> ActionResponse {
    let fields = require_field("name", &name)
        .and_then(|name| Ok((name, require_field("grade", &grade)?)));
    let (name, grade) = match fields {
        Ok(fields) => fields,
        Err(err) => return ActionResponse::failure(format!("student_add failed: {err}")),
    };
    let school_id = optional_reference(school_id.as_deref());

    mutate("student_add", "Student created.", |store| {
        store.add_student(name, grade, school_id).id
    })
}

/// Deletes a school. Linked employees/students are kept as-is.
///
/// # FFI contract
/// - Unknown ids are a successful no-op (`ok=true`, "not found" message).
#[flutter_rust_bridge::frb(sync)]
pub fn school_delete(school_id: String) -> ActionResponse {
    delete("school_delete", school_id, |store, id| store.delete_school(id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn employee_delete(employee_id: String) -> ActionResponse {
    delete("employee_delete", employee_id, |store, id| {
        store.delete_employee(id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn student_delete(student_id: String) -> ActionResponse {
    delete("student_delete", student_id, |store, id| {
        store.delete_student(id)
    })
}

/// Loads all three lists in stored order with resolved school names.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_load() -> DashboardResponse {
    let loaded = with_store(|store| DashboardResponse {
        ok: true,
        schools: store
            .schools()
            .iter()
            .map(|school| SchoolItem {
                id: school.id.to_string(),
                name: school.name.clone(),
                address: school.address.clone(),
                school_type: school.kind.clone(),
            })
            .collect(),
        employees: store
            .employee_rows()
            .into_iter()
            .map(|row| EmployeeItem {
                id: row.employee.id.to_string(),
                name: row.employee.name.clone(),
                role: row.employee.role.clone(),
                school_id: row.employee.school_id.as_ref().map(RecordId::to_string),
                school_name: row.school.label().to_string(),
                school_resolved: row.school.is_resolved(),
            })
            .collect(),
        students: store
            .student_rows()
            .into_iter()
            .map(|row| StudentItem {
                id: row.student.id.to_string(),
                name: row.student.name.clone(),
                grade: row.student.grade.clone(),
                school_id: row.student.school_id.as_ref().map(RecordId::to_string),
                school_name: row.school.label().to_string(),
                school_resolved: row.school.is_resolved(),
            })
            .collect(),
        message: String::new(),
    });

    loaded.unwrap_or_else(|err| DashboardResponse {
        message: format!("dashboard_load failed: {err}"),
        ..DashboardResponse::default()
    })
}

/// Lists schools for the employee/student form picker.
///
/// # FFI contract
/// - Items follow stored order; the placeholder entry is the UI's concern.
#[flutter_rust_bridge::frb(sync)]
pub fn school_options() -> SchoolOptionsResponse {
    let loaded = with_store(|store| {
        store
            .school_options()
            .into_iter()
            .map(|option| SchoolOptionItem {
                id: option.id.to_string(),
                name: option.name,
            })
            .collect::<Vec<_>>()
    });
    match loaded {
        Ok(items) => SchoolOptionsResponse {
            ok: true,
            items,
            message: String::new(),
        },
        Err(err) => SchoolOptionsResponse {
            message: format!("school_options failed: {err}"),
            ..SchoolOptionsResponse::default()
        },
    }
}

/// Returns dashboard counters.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_stats() -> StatsResponse {
    match with_store(|store| store.stats()) {
        Ok(stats) => StatsResponse {
            ok: true,
            schools: saturating_u32(stats.schools),
            employees: saturating_u32(stats.employees),
            students: saturating_u32(stats.students),
            message: String::new(),
        },
        Err(err) => StatsResponse {
            message: format!("dashboard_stats failed: {err}"),
            ..StatsResponse::default()
        },
    }
}

type FfiStore<'conn> = RecordStore<SqliteBlobStore<'conn>>;

fn mutate(
    op: &'static str,
    ok_message: &'static str,
    f: impl FnOnce(&mut FfiStore<'_>) -> RecordId,
) -> ActionResponse {
    let outcome = with_store(|store| {
        let id = f(&mut *store);
        (id, store.is_dirty())
    });
    match outcome {
        Ok((id, false)) => ActionResponse::success(ok_message, id.to_string()),
        Ok((id, true)) => {
            warn!("event={op} module=ffi status=error error_code=persist_failed id={id}");
            ActionResponse::failure(format!("{op} failed: change could not be saved"))
        }
        Err(err) => ActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn delete(
    op: &'static str,
    raw_id: String,
    f: impl FnOnce(&mut FfiStore<'_>, &RecordId) -> bool,
) -> ActionResponse {
    let id = RecordId::new(raw_id.trim());
    let outcome = with_store(|store| (f(&mut *store, &id), store.is_dirty()));
    match outcome {
        Ok((_, true)) => ActionResponse::failure(format!("{op} failed: change could not be saved")),
        Ok((true, false)) => ActionResponse::success("Deleted.", id.to_string()),
        Ok((false, false)) => ActionResponse::success("Nothing to delete.", id.to_string()),
        Err(err) => ActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn load_env_config() -> StoreConfig {
    StoreConfig::from_env().unwrap_or_else(|err| {
        warn!("event=config_load module=ffi status=error error={err}");
        StoreConfig::default()
    })
}

fn store_config() -> &'static StoreConfig {
    STORE_CONFIG.get_or_init(load_env_config)
}

fn with_store<T>(f: impl FnOnce(&mut FfiStore<'_>) -> T) -> Result<T, String> {
    let _guard = STORE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let config = store_config();
    let conn = open_db(&config.db_path).map_err(|err| format!("store DB open failed: {err}"))?;
    let blob =
        SqliteBlobStore::try_new(&conn).map_err(|err| format!("blob store init failed: {err}"))?;
    let mut store =
        RecordStore::open(blob, config.recovery).map_err(|err| format!("store load failed: {err}"))?;
    Ok(f(&mut store))
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
