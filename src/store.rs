use crate::kv::KeyValueStore;
use crate::model::{AttendanceRecord, Grade, Student};
use crate::prefs::AmbientPreference;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const STUDENTS_SLOT: &str = "students";
pub const ATTENDANCE_SLOT: &str = "attendance";
pub const GRADES_SLOT: &str = "grades";
pub const DARK_MODE_SLOT: &str = "darkMode";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
    #[error("stored slot `{slot}` is corrupt: {source}")]
    CorruptState {
        slot: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode slot `{slot}`: {source}")]
    Encode {
        slot: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Backend(_) => "store_failed",
            StoreError::CorruptState { .. } => "corrupt_state",
            StoreError::Encode { .. } => "store_failed",
        }
    }

    pub fn slot(&self) -> Option<&'static str> {
        match self {
            StoreError::Backend(_) => None,
            StoreError::CorruptState { slot, .. } | StoreError::Encode { slot, .. } => Some(*slot),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Student, attendance and grade collections persisted into a key-value namespace.
///
/// Every write rewrites the whole affected slot. Reads always hand back a freshly
/// decoded collection, so callers never see a list change underneath them.
pub struct RecordStore<K, P> {
    kv: K,
    ambient: P,
}

impl<K: KeyValueStore, P: AmbientPreference> RecordStore<K, P> {
    pub fn new(kv: K, ambient: P) -> Self {
        Self { kv, ambient }
    }

    fn load_slot<T: DeserializeOwned>(&self, slot: &'static str) -> StoreResult<Option<T>> {
        let Some(raw) = self.kv.load(slot)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::CorruptState { slot, source })
    }

    fn save_slot<T: Serialize + ?Sized>(&mut self, slot: &'static str, value: &T) -> StoreResult<()> {
        let raw =
            serde_json::to_string(value).map_err(|source| StoreError::Encode { slot, source })?;
        self.kv.save(slot, &raw)?;
        tracing::debug!(slot, bytes = raw.len(), "slot saved");
        Ok(())
    }

    pub fn list_students(&self) -> StoreResult<Vec<Student>> {
        Ok(self.load_slot(STUDENTS_SLOT)?.unwrap_or_default())
    }

    pub fn find_student(&self, id: &str) -> StoreResult<Option<Student>> {
        Ok(self.list_students()?.into_iter().find(|s| s.id == id))
    }

    /// Appends without checking for an existing id.
    pub fn add_student(&mut self, student: Student) -> StoreResult<()> {
        let mut students = self.list_students()?;
        students.push(student);
        self.save_slot(STUDENTS_SLOT, &students)
    }

    /// Replaces the first student with the same id. Returns false (and writes nothing)
    /// when no such student exists.
    pub fn replace_student(&mut self, student: Student) -> StoreResult<bool> {
        let mut students = self.list_students()?;
        let Some(slot) = students.iter_mut().find(|s| s.id == student.id) else {
            return Ok(false);
        };
        *slot = student;
        self.save_slot(STUDENTS_SLOT, &students)?;
        Ok(true)
    }

    /// Removes the student and every attendance record and grade that references it.
    ///
    /// All three slots are decoded before anything is written. Dependent slots are
    /// written first so a failed write leaves the student in place for a retry.
    pub fn delete_student(&mut self, id: &str) -> StoreResult<bool> {
        let mut students = self.list_students()?;
        let mut attendance = self.list_attendance()?;
        let mut grades = self.list_grades()?;

        let before = students.len();
        students.retain(|s| s.id != id);
        let removed = students.len() != before;
        let attendance_before = attendance.len();
        attendance.retain(|a| a.student_id != id);
        let grades_before = grades.len();
        grades.retain(|g| g.student_id != id);

        self.save_slot(ATTENDANCE_SLOT, &attendance)?;
        self.save_slot(GRADES_SLOT, &grades)?;
        self.save_slot(STUDENTS_SLOT, &students)?;

        tracing::info!(
            student_id = id,
            removed,
            attendance_removed = attendance_before - attendance.len(),
            grades_removed = grades_before - grades.len(),
            "student deleted"
        );
        Ok(removed)
    }

    pub fn list_attendance(&self) -> StoreResult<Vec<AttendanceRecord>> {
        Ok(self.load_slot(ATTENDANCE_SLOT)?.unwrap_or_default())
    }

    pub fn mark_attendance(&mut self, student_id: &str, date: &str, present: bool) -> StoreResult<()> {
        let mut attendance = self.list_attendance()?;
        match attendance
            .iter_mut()
            .find(|a| a.student_id == student_id && a.date == date)
        {
            Some(existing) => existing.present = present,
            None => attendance.push(AttendanceRecord {
                student_id: student_id.to_string(),
                date: date.to_string(),
                present,
            }),
        }
        self.save_slot(ATTENDANCE_SLOT, &attendance)
    }

    pub fn list_grades(&self) -> StoreResult<Vec<Grade>> {
        Ok(self.load_slot(GRADES_SLOT)?.unwrap_or_default())
    }

    /// Inserts the grade, replacing any earlier grade for the same student and subject.
    pub fn add_grade(&mut self, grade: Grade) -> StoreResult<()> {
        let mut grades = self.list_grades()?;
        match grades
            .iter_mut()
            .find(|g| g.student_id == grade.student_id && g.subject == grade.subject)
        {
            Some(existing) => *existing = grade,
            None => grades.push(grade),
        }
        self.save_slot(GRADES_SLOT, &grades)
    }

    pub fn theme_preference(&self) -> StoreResult<bool> {
        match self.load_slot::<bool>(DARK_MODE_SLOT)? {
            Some(v) => Ok(v),
            None => Ok(self.ambient.prefers_dark()),
        }
    }

    pub fn set_theme_preference(&mut self, dark_mode: bool) -> StoreResult<()> {
        self.save_slot(DARK_MODE_SLOT, &dark_mode)
    }
}
