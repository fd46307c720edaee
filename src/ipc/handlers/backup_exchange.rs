use crate::backup;
use crate::export;
use crate::ipc::error::{err, ok, HandlerErr};
use crate::ipc::handlers::core::open_workspace;
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::model::{AttendanceRecord, Grade, Student};
use crate::store::StoreResult;
use serde_json::json;
use std::path::PathBuf;

fn load_collections(
    store: &WorkspaceStore,
) -> StoreResult<(Vec<Student>, Vec<AttendanceRecord>, Vec<Grade>)> {
    Ok((
        store.list_students()?,
        store.list_attendance()?,
        store.list_grades()?,
    ))
}

fn handle_exchange_export_students_csv(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let out = match (
        req.params.get("outPath").and_then(|v| v.as_str()),
        req.params.get("outDir").and_then(|v| v.as_str()),
    ) {
        (Some(p), _) if !p.trim().is_empty() => PathBuf::from(p.trim()),
        (_, Some(d)) if !d.trim().is_empty() => PathBuf::from(d.trim())
            .join(export::default_file_name(chrono::Local::now().date_naive())),
        _ => return err(&req.id, "bad_params", "missing outPath or outDir", None),
    };

    let (students, attendance, grades) = match load_collections(store) {
        Ok(v) => v,
        Err(e) => return HandlerErr::from(e).response(&req.id),
    };
    let csv = export::students_csv(&students, &attendance, &grades);

    let out_path = out.to_string_lossy().to_string();
    if let Some(parent) = out.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            return err(
                &req.id,
                "io_failed",
                e.to_string(),
                Some(json!({ "path": out_path })),
            );
        }
    }
    if let Err(e) = std::fs::write(&out, csv) {
        return err(
            &req.id,
            "io_failed",
            e.to_string(),
            Some(json!({ "path": out_path })),
        );
    }

    tracing::info!(path = %out_path, rows = students.len(), "students exported");
    ok(
        &req.id,
        json!({ "ok": true, "rowsExported": students.len(), "path": out_path }),
    )
}

fn handle_backup_export_workspace_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(workspace) = state.workspace.clone() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let out_path = match req.params.get("outPath").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => return err(&req.id, "bad_params", "missing outPath", None),
    };
    match backup::export_workspace_bundle(&workspace, &out_path) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "ok": true,
                "path": out_path.to_string_lossy(),
                "bundleFormat": summary.bundle_format,
                "entryCount": summary.entry_count,
                "dbSha256": summary.db_sha256
            }),
        ),
        Err(e) => err(&req.id, "io_failed", format!("{e:#}"), None),
    }
}

fn handle_backup_import_workspace_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let in_path = match req.params.get("inPath").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => return err(&req.id, "bad_params", "missing inPath", None),
    };
    let workspace = match req
        .params
        .get("workspacePath")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
        .or_else(|| state.workspace.clone())
    {
        Some(p) => p,
        None => return err(&req.id, "bad_params", "missing workspacePath", None),
    };

    // Release the open connection before the database file is replaced underneath it.
    let was_open = state.workspace.as_deref() == Some(workspace.as_path());
    if was_open {
        state.store = None;
        state.workspace = None;
    }

    let summary = match backup::import_workspace_bundle(&in_path, &workspace) {
        Ok(s) => s,
        Err(e) => {
            let mut details = None;
            if was_open {
                if let Err(reopen) = open_workspace(state, &workspace) {
                    tracing::warn!(
                        workspace = %workspace.display(),
                        error = %format!("{reopen:#}"),
                        "workspace not reopened after failed import"
                    );
                    details = Some(json!({ "reopenError": format!("{reopen:#}") }));
                }
            }
            return err(&req.id, "io_failed", format!("{e:#}"), details);
        }
    };
    if let Err(e) = open_workspace(state, &workspace) {
        return err(&req.id, "db_open_failed", format!("{e:#}"), None);
    }
    ok(
        &req.id,
        json!({
            "ok": true,
            "workspacePath": workspace.to_string_lossy(),
            "bundleFormatDetected": summary.bundle_format_detected,
            "dbSha256": summary.db_sha256
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "exchange.exportStudentsCsv" => Some(handle_exchange_export_students_csv(state, req)),
        "backup.exportWorkspaceBundle" => Some(handle_backup_export_workspace_bundle(state, req)),
        "backup.importWorkspaceBundle" => Some(handle_backup_import_workspace_bundle(state, req)),
        _ => None,
    }
}
