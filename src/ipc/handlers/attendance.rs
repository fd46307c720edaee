use crate::calc;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_str, get_required_bool, get_required_str, today, with_store};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::validate;
use serde_json::json;

fn parse_day(raw: &str) -> Result<String, HandlerErr> {
    validate::calendar_day(raw).ok_or_else(|| {
        HandlerErr::bad_params("date must be YYYY-MM-DD").with_details(json!({ "date": raw }))
    })
}

fn attendance_list(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = match get_optional_str(params, "date") {
        Some(d) => Some(parse_day(&d)?),
        None => None,
    };
    let student_id = get_optional_str(params, "studentId");
    let records: Vec<_> = store
        .list_attendance()?
        .into_iter()
        .filter(|a| date.as_deref().map_or(true, |d| a.date == d))
        .filter(|a| student_id.as_deref().map_or(true, |s| a.student_id == s))
        .collect();
    Ok(json!({ "records": records }))
}

fn attendance_mark(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let date = parse_day(&get_required_str(params, "date")?)?;
    let present = get_required_bool(params, "present")?;
    if store.find_student(&student_id)?.is_none() {
        return Err(HandlerErr::not_found("student not found"));
    }
    store.mark_attendance(&student_id, &date, present)?;
    let records = store.list_attendance()?;
    Ok(json!({
        "ok": true,
        "attendancePercentage": calc::attendance_percentage(&student_id, &records)
    }))
}

fn attendance_day_summary(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = match get_optional_str(params, "date") {
        Some(d) => parse_day(&d)?,
        None => today(),
    };
    let students = store.list_students()?;
    let attendance = store.list_attendance()?;
    let summary = calc::day_summary(&students, &attendance, &date);
    Ok(json!({
        "date": date,
        "present": summary.present,
        "absent": summary.absent,
        "notMarked": summary.not_marked
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.list" => Some(with_store(state, req, attendance_list)),
        "attendance.mark" => Some(with_store(state, req, attendance_mark)),
        "attendance.daySummary" => Some(with_store(state, req, attendance_day_summary)),
        _ => None,
    }
}
