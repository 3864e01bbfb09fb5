use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the menu configuration file
pub const MENU_FILE_ENV_VAR: &str = "MENU_EDITOR_FILE";

/// Used when neither `--file` nor the environment names a file
pub const DEFAULT_MENU_FILE: &str = "menu.json";

/// Determines which menu configuration file to edit.
///
/// An explicit path wins, then `MENU_EDITOR_FILE`, then `menu.json` in
/// the current directory.
pub fn determine_menu_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    resolve_from_env(env::var(MENU_FILE_ENV_VAR).ok())
}

fn resolve_from_env(value: Option<String>) -> PathBuf {
    match value {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_MENU_FILE),
    }
}
