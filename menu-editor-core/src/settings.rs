use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::drag::DropZones;
use crate::id_gen::DEFAULT_ID_PREFIX;
use crate::models::{DisplayStyle, SubmenuLayout};

/// Environment variable overriding the settings file location
pub const SETTINGS_ENV_VAR: &str = "MENU_EDITOR_CONFIG";

/// Editor preferences, stored as YAML in the user's config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Prefix for minted identifiers (`menu` gives `menu_home`)
    pub id_prefix: String,

    /// Appended to the title of a duplicated item
    pub copy_suffix: String,

    /// Row bands used to turn pointer position into a drop position
    pub drop_zones: DropZones,

    /// Title given to a newly added menu item
    pub new_item_title: String,

    /// Title given to a newly added submenu
    pub new_container_title: String,

    pub new_container_style: DisplayStyle,

    pub new_container_layout: SubmenuLayout,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            copy_suffix: "(Copy)".to_string(),
            drop_zones: DropZones::default(),
            new_item_title: "New Menu Item".to_string(),
            new_container_title: "New Submenu".to_string(),
            new_container_style: DisplayStyle::default(),
            new_container_layout: SubmenuLayout::default(),
        }
    }
}

impl EditorSettings {
    /// Loads settings from the provided path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;

        let settings: EditorSettings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path.as_ref()))?;

        settings
            .drop_zones
            .validate()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid settings in {:?}", path.as_ref()))?;

        Ok(settings)
    }

    /// Loads settings, falling back to defaults when the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads settings from the standard location
    pub fn load_user() -> Result<Self> {
        Self::load_or_default(get_settings_path()?)
    }

    /// Save the settings to the specified path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(&self)?;

        // Ensure parent directories exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Writes default settings unless the file already exists
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<bool> {
        if path.as_ref().exists() {
            return Ok(false);
        }
        Self::default().save(path)?;
        Ok(true)
    }
}

/// Gets the path to the settings file
pub fn get_settings_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(SETTINGS_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dirs::config_dir().context("Failed to determine config directory")?;

    Ok(config_dir.join("menu-editor").join("settings.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = EditorSettings::default();
        assert_eq!(settings.id_prefix, "menu");
        assert_eq!(settings.copy_suffix, "(Copy)");
        assert_eq!(settings.drop_zones, DropZones::default());
        assert_eq!(settings.new_container_style, DisplayStyle::FullScreen);
        assert_eq!(settings.new_container_layout, SubmenuLayout::Grid);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.yaml");
        let settings = EditorSettings::load_or_default(&path).unwrap();
        assert_eq!(settings, EditorSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.yaml");

        let mut settings = EditorSettings::default();
        settings.id_prefix = "nav".to_string();
        settings.new_container_layout = SubmenuLayout::List;
        settings.save(&path).unwrap();

        let loaded = EditorSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.yaml");
        fs::write(&path, "id_prefix: screen\n").unwrap();

        let loaded = EditorSettings::load(&path).unwrap();
        assert_eq!(loaded.id_prefix, "screen");
        assert_eq!(loaded.copy_suffix, "(Copy)");
    }

    #[test]
    fn test_invalid_drop_zones_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.yaml");
        fs::write(&path, "drop_zones:\n  before: 0.9\n  after: 0.1\n").unwrap();

        let err = EditorSettings::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("drop zones"));
    }

    #[test]
    fn test_create_default_only_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.yaml");

        assert!(EditorSettings::create_default(&path).unwrap());
        assert!(!EditorSettings::create_default(&path).unwrap());
    }
}
