use crate::model::{AttendanceRecord, Grade, GradeMark, LetterGrade, Student};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Round to the nearest integer with ties going up: `Int(x + 0.5)`.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Two-decimal variant of [`round_half_up`].
pub fn round_half_up_2_decimal(x: f64) -> f64 {
    round_half_up(x * 100.0) / 100.0
}

/// Share of days the student was marked present, as a whole percent.
/// A student with no records at all is 0, not undefined.
pub fn attendance_percentage(student_id: &str, records: &[AttendanceRecord]) -> u32 {
    let mut total: usize = 0;
    let mut present: usize = 0;
    for r in records.iter().filter(|r| r.student_id == student_id) {
        total += 1;
        if r.present {
            present += 1;
        }
    }
    if total == 0 {
        return 0;
    }
    round_half_up(100.0 * present as f64 / total as f64) as u32
}

pub fn letter_grade(percentage: u32) -> LetterGrade {
    match percentage {
        p if p >= 90 => LetterGrade::APlus,
        p if p >= 80 => LetterGrade::A,
        p if p >= 70 => LetterGrade::B,
        p if p >= 60 => LetterGrade::C,
        p if p >= 50 => LetterGrade::D,
        _ => LetterGrade::F,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGpa {
    pub percentage: u32,
    pub grade: GradeMark,
    pub gpa: f64,
}

impl StudentGpa {
    pub const UNGRADED: StudentGpa = StudentGpa {
        percentage: 0,
        grade: GradeMark::NotAvailable,
        gpa: 0.0,
    };
}

/// Aggregate over every subject the student has a grade in.
///
/// Marks and maximums are summed before dividing, so a subject out of 200
/// carries twice the weight of one out of 100.
pub fn student_gpa(student_id: &str, grades: &[Grade]) -> StudentGpa {
    let mut count: usize = 0;
    let mut sum_marks: f64 = 0.0;
    let mut sum_max: f64 = 0.0;
    for g in grades.iter().filter(|g| g.student_id == student_id) {
        count += 1;
        sum_marks += g.marks;
        sum_max += g.max_marks;
    }
    if count == 0 || sum_max <= 0.0 {
        return StudentGpa::UNGRADED;
    }

    let percentage = round_half_up(100.0 * sum_marks / sum_max).max(0.0) as u32;
    StudentGpa {
        percentage,
        grade: GradeMark::Letter(letter_grade(percentage)),
        gpa: round_half_up_2_decimal(percentage as f64 / 25.0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: usize,
    pub present_today: usize,
    pub average_gpa: f64,
    pub course_distribution: BTreeMap<String, usize>,
}

pub fn dashboard_stats(
    students: &[Student],
    attendance: &[AttendanceRecord],
    grades: &[Grade],
    today: &str,
) -> DashboardStats {
    let present_today = attendance
        .iter()
        .filter(|a| a.date == today && a.present)
        .count();

    let mut gpa_sum = 0.0;
    let mut course_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for s in students {
        gpa_sum += student_gpa(&s.id, grades).gpa;
        *course_distribution.entry(s.course.clone()).or_insert(0) += 1;
    }
    let average_gpa = if students.is_empty() {
        0.0
    } else {
        gpa_sum / students.len() as f64
    };

    DashboardStats {
        total_students: students.len(),
        present_today,
        average_gpa,
        course_distribution,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStudent {
    #[serde(flatten)]
    pub student: Student,
    pub gpa: f64,
    pub attendance_percentage: u32,
}

/// Students ordered by GPA, best first, cut to `limit`.
///
/// Equal GPAs keep the order they were passed in.
pub fn top_ranked(
    students: &[Student],
    grades: &[Grade],
    attendance: &[AttendanceRecord],
    limit: usize,
) -> Vec<RankedStudent> {
    let mut ranked: Vec<RankedStudent> = students
        .iter()
        .map(|s| RankedStudent {
            gpa: student_gpa(&s.id, grades).gpa,
            attendance_percentage: attendance_percentage(&s.id, attendance),
            student: s.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| b.gpa.partial_cmp(&a.gpa).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub present: usize,
    pub absent: usize,
    pub not_marked: usize,
}

/// Roll-call counts for one calendar day.
pub fn day_summary(students: &[Student], attendance: &[AttendanceRecord], date: &str) -> DaySummary {
    let mut present = 0usize;
    let mut absent = 0usize;
    for a in attendance.iter().filter(|a| a.date == date) {
        if a.present {
            present += 1;
        } else {
            absent += 1;
        }
    }
    DaySummary {
        present,
        absent,
        not_marked: students.len().saturating_sub(present + absent),
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub search: Option<String>,
    pub course: Option<String>,
    pub year: Option<i64>,
}

impl StudentFilter {
    pub fn matches(&self, s: &Student) -> bool {
        if let Some(needle) = self.search.as_deref() {
            let needle = needle.to_lowercase();
            let hit = s.name.to_lowercase().contains(&needle)
                || s.email.to_lowercase().contains(&needle)
                || s.id.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(course) = self.course.as_deref() {
            if s.course != course {
                return false;
            }
        }
        if let Some(year) = self.year {
            if s.year != year {
                return false;
            }
        }
        true
    }
}

pub fn filter_students<'a>(students: &'a [Student], filter: &StudentFilter) -> Vec<&'a Student> {
    students.iter().filter(|s| filter.matches(s)).collect()
}

pub fn course_options(students: &[Student]) -> Vec<String> {
    students
        .iter()
        .map(|s| s.course.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn year_options(students: &[Student]) -> Vec<i64> {
    students
        .iter()
        .map(|s| s.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReport {
    #[serde(flatten)]
    pub student: Student,
    pub attendance_percentage: u32,
    pub percentage: u32,
    pub grade: GradeMark,
    pub gpa: f64,
    pub grades: Vec<Grade>,
}

pub fn student_report(student: &Student, attendance: &[AttendanceRecord], grades: &[Grade]) -> StudentReport {
    let summary = student_gpa(&student.id, grades);
    StudentReport {
        student: student.clone(),
        attendance_percentage: attendance_percentage(&student.id, attendance),
        percentage: summary.percentage,
        grade: summary.grade,
        gpa: summary.gpa,
        grades: grades
            .iter()
            .filter(|g| g.student_id == student.id)
            .cloned()
            .collect(),
    }
}
