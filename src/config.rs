use crate::prefs::{parse_boolish, EnvPreference};
use std::path::PathBuf;

pub const WORKSPACE_ENV: &str = "ROSTERD_WORKSPACE";
pub const LOG_ENV: &str = "ROSTERD_LOG";
pub const PREFERS_DARK_ENV: &str = "ROSTERD_PREFERS_DARK";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Default)]
pub struct DaemonConfig {
    pub workspace: Option<PathBuf>,
    pub log_filter: Option<String>,
    pub prefers_dark: bool,
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        DaemonConfig {
            workspace: non_empty(WORKSPACE_ENV).map(PathBuf::from),
            log_filter: non_empty(LOG_ENV).or_else(|| non_empty("RUST_LOG")),
            prefers_dark: non_empty(PREFERS_DARK_ENV)
                .and_then(|v| parse_boolish(&v))
                .unwrap_or(false),
        }
    }

    pub fn ambient(&self) -> EnvPreference {
        EnvPreference {
            prefers_dark: self.prefers_dark,
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
