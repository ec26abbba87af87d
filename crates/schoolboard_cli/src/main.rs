//! Operator CLI over the SchoolBoard record store.
//!
//! # Responsibility
//! - Inspect and edit the same SQLite-backed store the UI uses.
//! - Surface snapshot recovery outcomes to the operator.

use clap::{Parser, Subcommand, ValueEnum};
use schoolboard_core::db::open_db;
use schoolboard_core::{
    init_logging_from_config, optional_reference, require_field, CollectionOrigin, RecordId,
    RecordStore, SnapshotRecovery, SqliteBlobStore, StoreConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "schoolboard", version, about = "School administration data store")]
struct Cli {
    /// SQLite file holding the collections (overrides SCHOOLBOARD_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level (overrides SCHOOLBOARD_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute log directory (overrides SCHOOLBOARD_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Refuse to start when a stored snapshot is malformed.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage info.
    Ping,
    /// Print record counts.
    Stats,
    /// Print where each collection was loaded from.
    Report,
    /// List one collection in stored order.
    List { collection: Collection },
    AddSchool {
        name: String,
        address: String,
        #[arg(long = "type")]
        kind: String,
    },
    AddEmployee {
        name: String,
        role: String,
        #[arg(long)]
        school: Option<String>,
    },
    AddStudent {
        name: String,
        grade: String,
        #[arg(long)]
        school: Option<String>,
    },
    /// Delete one record by id. Unknown ids are a no-op.
    Delete { collection: Collection, id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Collection {
    Schools,
    Employees,
    Students,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Ping = cli.command {
        println!("schoolboard_core ping={}", schoolboard_core::ping());
        println!("schoolboard_core version={}", schoolboard_core::core_version());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    init_logging_from_config(&config)?;

    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let blob = SqliteBlobStore::try_new(&conn).map_err(|err| err.to_string())?;
    let mut store = RecordStore::open(blob, config.recovery).map_err(|err| err.to_string())?;

    let recovered = store.load_report().recovered_keys();
    if !recovered.is_empty() {
        eprintln!(
            "warning: malformed snapshot replaced by seed data: {}",
            recovered.join(", ")
        );
    }

    match cli.command {
        Command::Ping => {}
        Command::Stats => {
            let stats = store.stats();
            println!("schools={}", stats.schools);
            println!("employees={}", stats.employees);
            println!("students={}", stats.students);
        }
        Command::Report => {
            for (key, origin) in store.load_report().entries() {
                println!("{key}={}", origin.as_str());
            }
            let seeded = store
                .load_report()
                .entries()
                .iter()
                .any(|(_, origin)| *origin == CollectionOrigin::Seeded);
            if seeded {
                println!("note: seeded collections are written on the first change");
            }
        }
        Command::List { collection } => list(&store, collection),
        Command::AddSchool {
            name,
            address,
            kind,
        } => {
            let school = store.add_school(
                required("name", &name)?,
                required("address", &address)?,
                required("type", &kind)?,
            );
            println!("{}", school.id);
        }
        Command::AddEmployee { name, role, school } => {
            let employee = store.add_employee(
                required("name", &name)?,
                required("role", &role)?,
                optional_reference(school.as_deref()),
            );
            println!("{}", employee.id);
        }
        Command::AddStudent {
            name,
            grade,
            school,
        } => {
            let student = store.add_student(
                required("name", &name)?,
                required("grade", &grade)?,
                optional_reference(school.as_deref()),
            );
            println!("{}", student.id);
        }
        Command::Delete { collection, id } => {
            let id = RecordId::new(id.trim());
            let removed = match collection {
                Collection::Schools => store.delete_school(&id),
                Collection::Employees => store.delete_employee(&id),
                Collection::Students => store.delete_student(&id),
            };
            println!("{}", if removed { "deleted" } else { "not found" });
        }
    }

    if store.is_dirty() {
        return Err("change could not be saved; see log for details".to_string());
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<StoreConfig, String> {
    let mut config = StoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    if cli.strict {
        config.recovery = SnapshotRecovery::Fail;
    }
    Ok(config)
}

fn required(field: &'static str, value: &str) -> Result<String, String> {
    require_field(field, value).map_err(|err| err.to_string())
}

fn list(store: &RecordStore<SqliteBlobStore<'_>>, collection: Collection) {
    match collection {
        Collection::Schools => {
            for school in store.schools() {
                println!(
                    "{}\t{}\t{}\t{}",
                    school.id, school.name, school.address, school.kind
                );
            }
        }
        Collection::Employees => {
            for row in store.employee_rows() {
                println!(
                    "{}\t{}\t{}\t{}",
                    row.employee.id, row.employee.name, row.employee.role, row.school
                );
            }
        }
        Collection::Students => {
            for row in store.student_rows() {
                println!(
                    "{}\t{}\t{}\t{}",
                    row.student.id, row.student.name, row.student.grade, row.school
                );
            }
        }
    }
}
