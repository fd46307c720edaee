use std::path::PathBuf;

use serde::Deserialize;

use crate::config::DaemonConfig;
use crate::kv::SqliteKv;
use crate::prefs::EnvPreference;
use crate::store::RecordStore;

pub type WorkspaceStore = RecordStore<SqliteKv, EnvPreference>;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: DaemonConfig,
    pub workspace: Option<PathBuf>,
    pub store: Option<WorkspaceStore>,
}

impl AppState {
    pub fn new(config: DaemonConfig) -> Self {
        AppState {
            config,
            workspace: None,
            store: None,
        }
    }
}
