use crate::calc;
use crate::model::{AttendanceRecord, Grade, Student};
use chrono::NaiveDate;

pub const EXPORT_HEADER: [&str; 8] = [
    "ID",
    "Name",
    "Email",
    "Course",
    "Year",
    "Attendance %",
    "Grade",
    "GPA",
];

fn csv_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// One export row per student, in stored order, values already formatted.
pub fn export_rows(
    students: &[Student],
    attendance: &[AttendanceRecord],
    grades: &[Grade],
) -> Vec<[String; 8]> {
    students
        .iter()
        .map(|s| {
            let summary = calc::student_gpa(&s.id, grades);
            [
                s.id.clone(),
                s.name.clone(),
                s.email.clone(),
                s.course.clone(),
                s.year.to_string(),
                format!("{}%", calc::attendance_percentage(&s.id, attendance)),
                summary.grade.to_string(),
                summary.gpa.to_string(),
            ]
        })
        .collect()
}

/// Full CSV document: header plus one line per student, every field quoted.
pub fn students_csv(students: &[Student], attendance: &[AttendanceRecord], grades: &[Grade]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(students.len() + 1);
    lines.push(
        EXPORT_HEADER
            .iter()
            .map(|h| csv_quote(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in export_rows(students, attendance, grades) {
        lines.push(row.iter().map(|f| csv_quote(f)).collect::<Vec<_>>().join(","));
    }
    lines.join("\n")
}

pub fn default_file_name(day: NaiveDate) -> String {
    format!("students_{}.csv", day.format("%Y-%m-%d"))
}
