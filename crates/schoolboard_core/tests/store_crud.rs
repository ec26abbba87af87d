use schoolboard_core::{
    Collections, MemoryBlobStore, RecordId, RecordStore, SchoolName, SnapshotRecovery,
    UNRESOLVED_SCHOOL_LABEL,
};
use std::collections::HashSet;

fn empty_store() -> RecordStore<MemoryBlobStore> {
    RecordStore::with_collections(MemoryBlobStore::new(), Collections::default())
}

fn seeded_store() -> RecordStore<MemoryBlobStore> {
    RecordStore::open(MemoryBlobStore::new(), SnapshotRecovery::Fail).unwrap()
}

#[test]
fn first_open_seeds_two_schools_with_one_employee_and_student_each() {
    let store = seeded_store();

    let school_ids = store
        .schools()
        .iter()
        .map(|school| school.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(school_ids, vec!["s1", "s2"]);

    for school in store.schools() {
        let employees = store
            .employees()
            .iter()
            .filter(|e| e.school_id.as_ref() == Some(&school.id))
            .count();
        let students = store
            .students()
            .iter()
            .filter(|s| s.school_id.as_ref() == Some(&school.id))
            .count();
        assert_eq!((employees, students), (1, 1));
    }
}

#[test]
fn add_appends_in_insertion_order_and_persists() {
    let mut store = empty_store();

    let first = store.add_school("First", "Addr 1", "boys");
    let second = store.add_school("Second", "Addr 2", "girls");

    assert_eq!(store.schools(), &[first, second]);
    assert!(!store.is_dirty());
    assert_eq!(store.blob().write_count(), 6);
}

#[test]
fn add_employee_stores_unknown_school_id_verbatim() {
    let mut store = empty_store();

    let employee = store.add_employee("E", "role", Some(RecordId::new("nowhere")));

    assert_eq!(employee.school_id, Some(RecordId::new("nowhere")));
    assert_eq!(store.employee(&employee.id), Some(&employee));
    assert_eq!(
        store.resolve_school_name(&RecordId::new("nowhere")),
        SchoolName::Unresolved
    );
}

#[test]
fn lengths_track_adds_and_successful_deletes() {
    let mut store = seeded_store();
    let seed = store.stats();

    let school = store.add_school("S", "A", "t");
    let employee = store.add_employee("E", "r", Some(school.id.clone()));
    let student = store.add_student("St", "g", Some(school.id.clone()));
    store.add_student("St2", "g", None);

    assert!(store.delete_employee(&employee.id));
    assert!(store.delete_student(&student.id));
    assert!(!store.delete_student(&student.id));
    assert!(!store.delete_school(&RecordId::new("missing")));
    assert!(!store.delete_employee(&RecordId::new("missing")));

    let stats = store.stats();
    assert_eq!(stats.schools, seed.schools + 1);
    assert_eq!(stats.employees, seed.employees);
    assert_eq!(stats.students, seed.students + 1);
}

/// Small deterministic generator so every run replays the same sequences.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((self.0 >> 33) as usize) % bound
    }
}

#[test]
fn lengths_track_generated_add_delete_sequences() {
    for seed in 1..=64 {
        let mut rng = Lcg(seed);
        let mut store = seeded_store();
        let mut expected = store.stats();
        let mut known = store
            .schools()
            .iter()
            .map(|s| s.id.clone())
            .chain(store.employees().iter().map(|e| e.id.clone()))
            .chain(store.students().iter().map(|s| s.id.clone()))
            .collect::<Vec<_>>();

        for step in 0..60 {
            // Half of the deletes target an id that may be absent or already gone.
            let target = if known.is_empty() || rng.next(2) == 0 {
                RecordId::new(format!("missing-{seed}-{step}"))
            } else {
                known[rng.next(known.len())].clone()
            };

            match rng.next(6) {
                0 => {
                    known.push(store.add_school("S", "A", "t").id);
                    expected.schools += 1;
                }
                1 => {
                    known.push(store.add_employee("E", "r", Some(target)).id);
                    expected.employees += 1;
                }
                2 => {
                    known.push(store.add_student("St", "g", None).id);
                    expected.students += 1;
                }
                3 => {
                    let present = store.school(&target).is_some();
                    assert_eq!(store.delete_school(&target), present);
                    if present {
                        expected.schools -= 1;
                    }
                }
                4 => {
                    let present = store.employee(&target).is_some();
                    assert_eq!(store.delete_employee(&target), present);
                    if present {
                        expected.employees -= 1;
                    }
                }
                _ => {
                    let present = store.student(&target).is_some();
                    assert_eq!(store.delete_student(&target), present);
                    if present {
                        expected.students -= 1;
                    }
                }
            }

            assert_eq!(store.stats(), expected, "seed {seed} step {step}");
        }
    }
}

#[test]
fn delete_of_missing_id_leaves_collections_unchanged() {
    let mut store = seeded_store();
    let before = store.collections().clone();

    store.delete_school(&RecordId::new("s404"));
    store.delete_employee(&RecordId::new("e404"));
    store.delete_student(&RecordId::new("st404"));

    assert_eq!(store.collections(), &before);
}

#[test]
fn deleting_school_does_not_cascade() {
    let mut store = seeded_store();
    let employees_before = store.employees().to_vec();
    let students_before = store.students().to_vec();

    assert!(store.delete_school(&RecordId::new("s1")));

    assert_eq!(store.employees(), employees_before.as_slice());
    assert_eq!(store.students(), students_before.as_slice());
    let orphan = store.employee(&RecordId::new("e1")).unwrap();
    assert_eq!(orphan.school_id, Some(RecordId::new("s1")));
}

#[test]
fn resolve_school_name_handles_present_absent_and_deleted() {
    let mut store = seeded_store();
    let s2 = RecordId::new("s2");

    assert_eq!(
        store.resolve_school_name(&s2),
        SchoolName::Resolved("الثانوية الأولى")
    );
    assert_eq!(
        store.resolve_school_name(&RecordId::new("zzz")),
        SchoolName::Unresolved
    );

    store.delete_school(&s2);
    let name = store.resolve_school_name(&s2);
    assert!(!name.is_resolved());
    assert_eq!(name.label(), UNRESOLVED_SCHOOL_LABEL);
    assert_eq!(name.or("unknown"), "unknown");
}

#[test]
fn rows_pair_records_with_resolved_school_names() {
    let mut store = empty_store();
    let school = store.add_school("A", "Addr", "t");
    store.add_employee("E1", "r", Some(school.id.clone()));
    store.add_employee("E2", "r", None);
    store.add_student("S1", "g", Some(RecordId::new("gone")));

    let rows = store.employee_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].employee.name, "E1");
    assert_eq!(rows[0].school, SchoolName::Resolved("A"));
    assert_eq!(rows[1].school, SchoolName::Unresolved);

    let student_rows = store.student_rows();
    assert_eq!(student_rows[0].school.to_string(), UNRESOLVED_SCHOOL_LABEL);
}

#[test]
fn school_options_follow_stored_order() {
    let store = seeded_store();
    let options = store.school_options();

    assert_eq!(options.len(), 2);
    assert_eq!(options[0].id, RecordId::new("s1"));
    assert_eq!(options[1].name, "الثانوية الأولى");
}

#[test]
fn generate_id_yields_distinct_values() {
    let ids = (0..2_000)
        .map(|_| RecordStore::<MemoryBlobStore>::generate_id())
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 2_000);
}

#[test]
fn end_to_end_weak_reference_scenario() {
    let mut store = empty_store();

    let school = store.add_school("A", "Addr", "type1");
    let x = school.id.clone();
    let employee = store.add_employee("E", "role", Some(x.clone()));
    assert_eq!(employee.school_id, Some(x.clone()));
    assert_eq!(store.resolve_school_name(&x), SchoolName::Resolved("A"));

    assert!(store.delete_school(&x));

    assert_eq!(store.resolve_school_name(&x), SchoolName::Unresolved);
    let survivor = store
        .employees()
        .iter()
        .find(|e| e.name == "E")
        .expect("employee must survive school deletion");
    assert_eq!(survivor.school_id, Some(x));
}
