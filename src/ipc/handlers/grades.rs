use crate::calc;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_f64, get_optional_str, with_store};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::model::Grade;
use crate::validate;
use serde_json::json;

fn grades_list(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_optional_str(params, "studentId");
    let grades: Vec<Grade> = store
        .list_grades()?
        .into_iter()
        .filter(|g| student_id.as_deref().map_or(true, |s| g.student_id == s))
        .collect();
    Ok(json!({ "grades": grades }))
}

fn grades_add(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let input = validate::grade_input(
        params.get("studentId").and_then(|v| v.as_str()),
        params.get("subject").and_then(|v| v.as_str()),
        get_optional_f64(params, "marks")?,
        get_optional_f64(params, "maxMarks")?,
    )?;
    if store.find_student(&input.student_id)?.is_none() {
        return Err(HandlerErr::not_found("student not found"));
    }
    let grade = Grade {
        student_id: input.student_id,
        subject: input.subject,
        marks: input.marks,
        max_marks: input.max_marks,
    };
    store.add_grade(grade.clone())?;
    let grades = store.list_grades()?;
    Ok(json!({
        "grade": grade,
        "summary": calc::student_gpa(&grade.student_id, &grades)
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.list" => Some(with_store(state, req, grades_list)),
        "grades.add" => Some(with_store(state, req, grades_add)),
        _ => None,
    }
}
