use std::env;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "hermes";
const PROJECT_DIR_NAME: &str = ".hermes";
const PROJECT_MARKERS: &[&str] = &[".git", "Cargo.toml", "package.json", PROJECT_DIR_NAME];

pub fn find_project_root() -> Option<PathBuf> {
    let current = env::current_dir().ok()?;
    find_project_root_from(&current)
}

fn find_project_root_from(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        for marker in PROJECT_MARKERS {
            if dir.join(marker).exists() {
                return Some(dir.to_path_buf());
            }
        }
        dir = dir.parent()?;
    }
}

pub fn project_dir() -> Option<PathBuf> {
    find_project_root().map(|root| root.join(PROJECT_DIR_NAME))
}

fn xdg_dir(var: &str, fallback: &[&str]) -> Option<PathBuf> {
    if let Ok(dir) = env::var(var) {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(fallback.iter().fold(PathBuf::from(home), |path, part| path.join(part)))
}

/// `$XDG_CONFIG_HOME/hermes`, falling back to `~/.config/hermes`.
pub fn config_dir() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"]).map(|dir| dir.join(APP_DIR_NAME))
}

/// `$XDG_STATE_HOME/hermes`, falling back to `~/.local/state/hermes`.
pub fn state_dir() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", &[".local", "state"]).map(|dir| dir.join(APP_DIR_NAME))
}

pub fn default_presets_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("requests.json"))
}

pub fn default_log_path() -> Option<PathBuf> {
    state_dir().map(|dir| dir.join("hermes.log"))
}

pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str() {
        if let Some(rest) = s.strip_prefix('~') {
            if let Ok(home) = env::var("HOME") {
                return PathBuf::from(home).join(rest.strip_prefix('/').unwrap_or(rest));
            }
        }
    }
    path.to_path_buf()
}
