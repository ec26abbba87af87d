//! First-run bootstrap records.
//!
//! Used per collection whenever its key has no stored snapshot. Each seeded
//! school has exactly one employee and one student pointing at it.

use crate::model::record::RecordId;
use crate::model::school::School;
use crate::model::staff::{Employee, Student};

pub fn seed_schools() -> Vec<School> {
    vec![
        School::with_id(
            RecordId::new("s1"),
            "مدرسة المستقبل الأهلية",
            "الرياض - حي النخيل",
            "بنين",
        ),
        School::with_id(
            RecordId::new("s2"),
            "الثانوية الأولى",
            "جدة - حي الشاطئ",
            "بنات",
        ),
    ]
}

pub fn seed_employees() -> Vec<Employee> {
    vec![
        Employee::with_id(
            RecordId::new("e1"),
            "أحمد صالح",
            "مدير المدرسة",
            Some(RecordId::new("s1")),
        ),
        Employee::with_id(
            RecordId::new("e2"),
            "سارة محمد",
            "معلمة فيزياء",
            Some(RecordId::new("s2")),
        ),
    ]
}

pub fn seed_students() -> Vec<Student> {
    vec![
        Student::with_id(
            RecordId::new("st1"),
            "عمر خالد",
            "المرحلة الثانوية",
            Some(RecordId::new("s1")),
        ),
        Student::with_id(
            RecordId::new("st2"),
            "نورة عبدالله",
            "المرحلة الثانوية",
            Some(RecordId::new("s2")),
        ),
    ]
}
