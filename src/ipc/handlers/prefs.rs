use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_required_bool, with_store};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use serde_json::json;

fn theme_get(
    store: &mut WorkspaceStore,
    _params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({ "darkMode": store.theme_preference()? }))
}

fn theme_set(
    store: &mut WorkspaceStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let dark_mode = get_required_bool(params, "darkMode")?;
    store.set_theme_preference(dark_mode)?;
    Ok(json!({ "darkMode": dark_mode }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "prefs.theme.get" => Some(with_store(state, req, theme_get)),
        "prefs.theme.set" => Some(with_store(state, req, theme_set)),
        _ => None,
    }
}
