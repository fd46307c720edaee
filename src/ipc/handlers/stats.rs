use crate::calc;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_i64, get_optional_str, today, with_store};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::validate;
use serde_json::json;

const DEFAULT_TOP_LIMIT: i64 = 5;

fn stats_dashboard(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let today = match get_optional_str(params, "today") {
        Some(d) => validate::calendar_day(&d)
            .ok_or_else(|| HandlerErr::bad_params("today must be YYYY-MM-DD"))?,
        None => today(),
    };
    let students = store.list_students()?;
    let attendance = store.list_attendance()?;
    let grades = store.list_grades()?;
    let stats = calc::dashboard_stats(&students, &attendance, &grades, &today);
    Ok(json!({
        "today": today,
        "totalStudents": stats.total_students,
        "presentToday": stats.present_today,
        "averageGpa": stats.average_gpa,
        "courseDistribution": stats.course_distribution
    }))
}

fn stats_top_ranked(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let limit = get_optional_i64(params, "limit")?.unwrap_or(DEFAULT_TOP_LIMIT);
    if limit < 0 {
        return Err(HandlerErr::bad_params("limit must not be negative"));
    }
    let students = store.list_students()?;
    let attendance = store.list_attendance()?;
    let grades = store.list_grades()?;
    let ranked = calc::top_ranked(&students, &grades, &attendance, limit as usize);
    Ok(json!({ "students": ranked }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "stats.dashboard" => Some(with_store(state, req, stats_dashboard)),
        "stats.topRanked" => Some(with_store(state, req, stats_top_ranked)),
        _ => None,
    }
}
