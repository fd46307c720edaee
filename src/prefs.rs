/// Host-side signal consulted when the workspace has no stored theme.
pub trait AmbientPreference {
    fn prefers_dark(&self) -> bool;
}

/// Ambient preference taken from daemon configuration (`ROSTERD_PREFERS_DARK`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvPreference {
    pub prefers_dark: bool,
}

impl AmbientPreference for EnvPreference {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub struct FixedPreference(pub bool);

impl AmbientPreference for FixedPreference {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

pub fn parse_boolish(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
