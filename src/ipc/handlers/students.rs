use crate::calc::{self, StudentFilter};
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_i64, get_optional_str, get_required_str, with_store};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::model::Student;
use crate::validate::{self, StudentInput};
use serde_json::json;
use uuid::Uuid;

fn read_student_input(params: &serde_json::Value) -> Result<StudentInput, HandlerErr> {
    let year = get_optional_i64(params, "year")?;
    let input = validate::student_input(
        params.get("name").and_then(|v| v.as_str()),
        params.get("email").and_then(|v| v.as_str()),
        params.get("course").and_then(|v| v.as_str()),
        year,
    )?;
    Ok(input)
}

fn students_list(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let filter = StudentFilter {
        search: get_optional_str(params, "search"),
        course: get_optional_str(params, "course"),
        year: get_optional_i64(params, "year")?,
    };
    let students = store.list_students()?;
    let attendance = store.list_attendance()?;
    let grades = store.list_grades()?;

    let rows: Vec<_> = calc::filter_students(&students, &filter)
        .into_iter()
        .map(|s| calc::student_report(s, &attendance, &grades))
        .collect();
    Ok(json!({
        "students": rows,
        "matched": rows.len(),
        "total": students.len()
    }))
}

fn students_get(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let Some(student) = store.find_student(&student_id)? else {
        return Err(HandlerErr::not_found("student not found"));
    };
    let attendance = store.list_attendance()?;
    let grades = store.list_grades()?;
    Ok(json!(calc::student_report(&student, &attendance, &grades)))
}

fn students_create(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let input = read_student_input(params)?;
    let student = Student {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        email: input.email,
        course: input.course,
        year: input.year,
        registration_date: chrono::Utc::now().to_rfc3339(),
    };
    store.add_student(student.clone())?;
    tracing::info!(student_id = %student.id, "student created");
    Ok(json!({ "student": student }))
}

fn students_update(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let Some(existing) = store.find_student(&student_id)? else {
        return Err(HandlerErr::not_found("student not found"));
    };
    let input = read_student_input(params)?;
    let student = Student {
        id: existing.id,
        name: input.name,
        email: input.email,
        course: input.course,
        year: input.year,
        registration_date: existing.registration_date,
    };
    if !store.replace_student(student.clone())? {
        return Err(HandlerErr::not_found("student not found"));
    }
    Ok(json!({ "student": student }))
}

fn students_delete(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    if store.find_student(&student_id)?.is_none() {
        return Err(HandlerErr::not_found("student not found"));
    }
    store.delete_student(&student_id)?;
    Ok(json!({ "ok": true }))
}

fn students_facets(
    store: &mut WorkspaceStore,
    _params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let students = store.list_students()?;
    Ok(json!({
        "courses": calc::course_options(&students),
        "years": calc::year_options(&students)
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(with_store(state, req, students_list)),
        "students.get" => Some(with_store(state, req, students_get)),
        "students.create" => Some(with_store(state, req, students_create)),
        "students.update" => Some(with_store(state, req, students_update)),
        "students.delete" => Some(with_store(state, req, students_delete)),
        "students.facets" => Some(with_store(state, req, students_facets)),
        _ => None,
    }
}
