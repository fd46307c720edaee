#[path = "../src/kv.rs"]
mod kv;
#[path = "../src/model.rs"]
mod model;
#[path = "../src/prefs.rs"]
mod prefs;
#[path = "../src/store.rs"]
mod store;

use kv::{KeyValueStore, MemoryKv, SqliteKv};
use model::{Grade, Student};
use prefs::FixedPreference;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use store::{RecordStore, StoreError};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn student(id: &str, course: &str) -> Student {
    Student {
        id: id.to_string(),
        name: format!("Student {}", id),
        email: format!("{}@example.com", id),
        course: course.to_string(),
        year: 2024,
        registration_date: "2024-09-01T08:00:00+00:00".to_string(),
    }
}

fn grade(student_id: &str, subject: &str, marks: f64, max_marks: f64) -> Grade {
    Grade {
        student_id: student_id.to_string(),
        subject: subject.to_string(),
        marks,
        max_marks,
    }
}

fn memory_store() -> RecordStore<MemoryKv, FixedPreference> {
    RecordStore::new(MemoryKv::new(), FixedPreference(false))
}

#[test]
fn empty_namespace_reads_as_empty_collections() {
    let store = memory_store();
    assert!(store.list_students().expect("students").is_empty());
    assert!(store.list_attendance().expect("attendance").is_empty());
    assert!(store.list_grades().expect("grades").is_empty());
}

#[test]
fn add_student_appends_without_dedupe() {
    let mut store = memory_store();
    store.add_student(student("s1", "CS")).expect("add");
    store.add_student(student("s2", "Law")).expect("add");
    store.add_student(student("s1", "CS")).expect("add again");

    let ids: Vec<String> = store
        .list_students()
        .expect("students")
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["s1", "s2", "s1"]);
}

#[test]
fn replace_student_keeps_position_and_ignores_unknown_ids() {
    let mut store = memory_store();
    store.add_student(student("s1", "CS")).expect("add");
    store.add_student(student("s2", "Law")).expect("add");

    let mut renamed = student("s1", "Data Science");
    renamed.name = "Renamed".to_string();
    assert!(store.replace_student(renamed).expect("replace"));
    assert!(!store.replace_student(student("ghost", "CS")).expect("replace ghost"));

    let students = store.list_students().expect("students");
    assert_eq!(students.len(), 2);
    assert_eq!(students[0].id, "s1");
    assert_eq!(students[0].name, "Renamed");
    assert_eq!(students[0].course, "Data Science");
    assert_eq!(students[1].id, "s2");
}

#[test]
fn mark_attendance_twice_keeps_one_record_with_latest_value() {
    let mut store = memory_store();
    store.mark_attendance("s1", "2024-10-01", true).expect("mark");
    store.mark_attendance("s1", "2024-10-01", false).expect("remark");
    store.mark_attendance("s1", "2024-10-02", true).expect("next day");

    let records = store.list_attendance().expect("attendance");
    assert_eq!(records.len(), 2);
    let first = records
        .iter()
        .find(|r| r.date == "2024-10-01")
        .expect("first day");
    assert!(!first.present);
}

#[test]
fn add_grade_twice_keeps_one_record_with_latest_marks() {
    let mut store = memory_store();
    store.add_grade(grade("s1", "Physics", 40.0, 50.0)).expect("add");
    store.add_grade(grade("s1", "Physics", 90.0, 120.0)).expect("replace");
    store.add_grade(grade("s1", "Chemistry", 10.0, 20.0)).expect("other");

    let grades = store.list_grades().expect("grades");
    assert_eq!(grades.len(), 2);
    assert_eq!(grades[0], grade("s1", "Physics", 90.0, 120.0));
}

#[test]
fn delete_student_cascades_only_to_its_own_records() {
    let mut store = memory_store();
    store.add_student(student("s1", "CS")).expect("add");
    store.add_student(student("s2", "Law")).expect("add");
    store.mark_attendance("s1", "2024-10-01", true).expect("mark");
    store.mark_attendance("s2", "2024-10-01", false).expect("mark");
    store.add_grade(grade("s1", "Math", 80.0, 100.0)).expect("grade");
    store.add_grade(grade("s2", "Math", 70.0, 100.0)).expect("grade");

    assert!(store.delete_student("s1").expect("delete"));

    let students = store.list_students().expect("students");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, "s2");
    let attendance = store.list_attendance().expect("attendance");
    assert_eq!(attendance.len(), 1);
    assert_eq!(attendance[0].student_id, "s2");
    let grades = store.list_grades().expect("grades");
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].student_id, "s2");

    assert!(!store.delete_student("s1").expect("delete again"));
}

#[test]
fn theme_falls_back_to_ambient_until_stored() {
    let mut store = RecordStore::new(MemoryKv::new(), FixedPreference(true));
    assert!(store.theme_preference().expect("theme"));
    store.set_theme_preference(false).expect("set");
    assert!(!store.theme_preference().expect("theme"));

    let light_host = RecordStore::new(MemoryKv::new(), FixedPreference(false));
    assert!(!light_host.theme_preference().expect("theme"));
}

#[test]
fn delete_with_unreadable_dependent_slot_changes_nothing() {
    let mut seeded = memory_store();
    seeded.add_student(student("s1", "CS")).expect("add");
    seeded.add_grade(grade("s1", "Math", 80.0, 100.0)).expect("grade");
    let (students_raw, grades_raw) = {
        let students = serde_json::to_string(&seeded.list_students().expect("students")).expect("json");
        let grades = serde_json::to_string(&seeded.list_grades().expect("grades")).expect("json");
        (students, grades)
    };

    let kv = MemoryKv::new()
        .with_slot(store::STUDENTS_SLOT, &students_raw)
        .with_slot(store::ATTENDANCE_SLOT, "{not json")
        .with_slot(store::GRADES_SLOT, &grades_raw);
    let mut store = RecordStore::new(kv, FixedPreference(false));

    match store.delete_student("s1") {
        Err(StoreError::CorruptState { slot, .. }) => assert_eq!(slot, "attendance"),
        other => panic!("expected corrupt attendance, got {:?}", other),
    }
    let students = store.list_students().expect("students");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, "s1");
    let grades = store.list_grades().expect("grades");
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].student_id, "s1");
}

#[test]
fn corrupt_slot_is_reported_not_treated_as_empty() {
    let kv = MemoryKv::new().with_slot(store::STUDENTS_SLOT, "{not json");
    let store = RecordStore::new(kv, FixedPreference(false));
    match store.list_students() {
        Err(StoreError::CorruptState { slot, .. }) => assert_eq!(slot, "students"),
        other => panic!("expected corrupt state, got {:?}", other),
    }

    let kv = MemoryKv::new().with_slot(store::DARK_MODE_SLOT, "\"dark\"");
    let store = RecordStore::new(kv, FixedPreference(false));
    let e = store.theme_preference().unwrap_err();
    assert_eq!(e.code(), "corrupt_state");
    assert_eq!(e.slot(), Some("darkMode"));
}

#[test]
fn persisted_layout_uses_camel_case_json_arrays() {
    let workspace = temp_dir("rosterd-store-layout");
    {
        let kv = SqliteKv::open(&workspace).expect("open");
        let mut store = RecordStore::new(kv, FixedPreference(false));
        store.add_student(student("s1", "CS")).expect("add");
        store.add_grade(grade("s1", "Math", 80.0, 100.0)).expect("grade");
        store.set_theme_preference(true).expect("theme");
    }

    let kv = SqliteKv::open(&workspace).expect("reopen");
    let students: serde_json::Value =
        serde_json::from_str(&kv.load("students").expect("load").expect("slot")).expect("json");
    assert!(students.is_array());
    assert_eq!(students[0]["registrationDate"], "2024-09-01T08:00:00+00:00");
    let grades: serde_json::Value =
        serde_json::from_str(&kv.load("grades").expect("load").expect("slot")).expect("json");
    assert_eq!(grades[0]["studentId"], "s1");
    assert_eq!(grades[0]["maxMarks"], 100.0);
    assert_eq!(kv.load("darkMode").expect("load").as_deref(), Some("true"));
    assert_eq!(kv.load("attendance").expect("load"), None);

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn sqlite_namespace_survives_reopen() {
    let workspace = temp_dir("rosterd-store-reopen");
    {
        let kv = SqliteKv::open(&workspace).expect("open");
        let mut store = RecordStore::new(kv, FixedPreference(false));
        store.add_student(student("s1", "CS")).expect("add");
        store.mark_attendance("s1", "2024-10-01", true).expect("mark");
        store.set_theme_preference(true).expect("theme");
    }

    let kv = SqliteKv::open(&workspace).expect("reopen");
    let store = RecordStore::new(kv, FixedPreference(false));
    assert_eq!(store.list_students().expect("students").len(), 1);
    assert_eq!(store.list_attendance().expect("attendance").len(), 1);
    assert!(store.theme_preference().expect("theme"));

    let _ = std::fs::remove_dir_all(workspace);
}
