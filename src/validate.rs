use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

pub const MIN_YEAR: i64 = 2020;
pub const MAX_YEAR: i64 = 2030;

/// Per-field messages, keyed by the request field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors(pub BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[allow(dead_code)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|s| s.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    pub course: String,
    pub year: i64,
}

/// Loose `something@something.something` check, no whitespace allowed in any part.
pub fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    // Any dot after the '@' with something on both sides.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Trims the text fields and checks them the way the entry form does.
pub fn student_input(
    name: Option<&str>,
    email: Option<&str>,
    course: Option<&str>,
    year: Option<i64>,
) -> Result<StudentInput, FieldErrors> {
    let mut errors = FieldErrors::default();
    let name = name.map(str::trim).unwrap_or_default();
    let email = email.map(str::trim).unwrap_or_default();
    let course = course.map(str::trim).unwrap_or_default();

    if name.is_empty() {
        errors.push("name", "Name is required");
    }
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !looks_like_email(email) {
        errors.push("email", "Please enter a valid email");
    }
    if course.is_empty() {
        errors.push("course", "Course is required");
    }
    let year = match year {
        Some(y) if (MIN_YEAR..=MAX_YEAR).contains(&y) => y,
        _ => {
            errors.push("year", "Please enter a valid year");
            0
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(StudentInput {
        name: name.to_string(),
        email: email.to_string(),
        course: course.to_string(),
        year,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeInput {
    pub student_id: String,
    pub subject: String,
    pub marks: f64,
    pub max_marks: f64,
}

pub fn grade_input(
    student_id: Option<&str>,
    subject: Option<&str>,
    marks: Option<f64>,
    max_marks: Option<f64>,
) -> Result<GradeInput, FieldErrors> {
    let mut errors = FieldErrors::default();
    let student_id = student_id.map(str::trim).unwrap_or_default();
    let subject = subject.map(str::trim).unwrap_or_default();

    if student_id.is_empty() {
        errors.push("studentId", "Student is required");
    }
    if subject.is_empty() {
        errors.push("subject", "Subject is required");
    }
    let max_marks = match max_marks {
        Some(m) if m.is_finite() && m > 0.0 => Some(m),
        Some(_) => {
            errors.push("maxMarks", "Maximum marks must be greater than 0");
            None
        }
        None => {
            errors.push("maxMarks", "Maximum marks are required");
            None
        }
    };
    let marks = match marks {
        Some(m) if !m.is_finite() || m < 0.0 => {
            errors.push("marks", "Marks should be between 0 and maximum marks");
            None
        }
        Some(m) => {
            if let Some(max) = max_marks {
                if m > max {
                    errors.push("marks", "Marks should be between 0 and maximum marks");
                }
            }
            Some(m)
        }
        None => {
            errors.push("marks", "Marks are required");
            None
        }
    };

    match (marks, max_marks) {
        (Some(marks), Some(max_marks)) if errors.is_empty() => Ok(GradeInput {
            student_id: student_id.to_string(),
            subject: subject.to_string(),
            marks,
            max_marks,
        }),
        _ => Err(errors),
    }
}

/// Accepts a `YYYY-MM-DD` calendar day and returns it unchanged.
pub fn calendar_day(raw: &str) -> Option<String> {
    let t = raw.trim();
    NaiveDate::parse_from_str(t, "%Y-%m-%d").ok()?;
    if t.len() != 10 {
        return None;
    }
    Some(t.to_string())
}
