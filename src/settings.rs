//! User settings persistence
//!
//! Stores per-user engine state in `~/.config/folder-tint/settings.yaml`:
//! the applied theme id (only the id reference — never the scheme
//! payload), the live-update toggle, the folder ignore list, and the
//! stale-path policy.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::colorize::StalePolicy;
use crate::error::Result;
use crate::theme::ThemeId;

/// Settings that persist across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    /// Applied theme id (32-hex GUID string form)
    #[serde(default = "default_theme_id")]
    pub current_theme: String,

    /// Recolorize immediately when folders or the active theme change.
    /// Disable for very large projects where a full pass is expensive.
    #[serde(default = "default_live_update")]
    pub live_update: bool,

    /// Display-path prefixes excluded from the directory walk
    #[serde(default)]
    pub folder_ignore_list: Vec<String>,

    /// What happens to folders no scheme matches
    #[serde(default)]
    pub stale_policy: StalePolicy,
}

fn default_theme_id() -> String {
    ThemeId::NO_THEME.to_string()
}

fn default_live_update() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            current_theme: default_theme_id(),
            live_update: default_live_update(),
            folder_ignore_list: Vec::new(),
            stale_policy: StalePolicy::default(),
        }
    }
}

impl UserSettings {
    /// Load settings from the default location, or return defaults
    pub fn load() -> Self {
        match crate::paths::settings_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No config directory available, using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from `path`, or return defaults if missing/invalid
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("Settings file not found at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// The applied theme id, if the stored string still parses
    pub fn current_theme_id(&self) -> Option<ThemeId> {
        ThemeId::parse(&self.current_theme)
    }

    pub fn set_current_theme(&mut self, id: ThemeId) {
        self.current_theme = id.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = UserSettings::default();
        assert_eq!(settings.current_theme_id(), Some(ThemeId::NO_THEME));
        assert!(settings.live_update);
        assert!(settings.folder_ignore_list.is_empty());
        assert_eq!(settings.stale_policy, StalePolicy::Leave);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/settings.yaml");

        let mut settings = UserSettings::default();
        let id = ThemeId::random();
        settings.set_current_theme(id);
        settings.live_update = false;
        settings.stale_policy = StalePolicy::Clear;
        settings.folder_ignore_list = vec!["Game/Generated".to_string()];
        settings.save_to(&path).unwrap();

        let loaded = UserSettings::load_from(&path);
        assert_eq!(loaded.current_theme_id(), Some(id));
        assert!(!loaded.live_update);
        assert_eq!(loaded.stale_policy, StalePolicy::Clear);
        assert_eq!(loaded.folder_ignore_list, vec!["Game/Generated"]);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = UserSettings::load_from(&tmp.path().join("absent.yaml"));
        assert_eq!(settings.current_theme_id(), Some(ThemeId::NO_THEME));
    }

    #[test]
    fn test_invalid_yaml_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.yaml");
        std::fs::write(&path, ": not yaml [").unwrap();
        let settings = UserSettings::load_from(&path);
        assert!(settings.live_update);
    }

    #[test]
    fn test_unparseable_theme_id_is_none() {
        let settings = UserSettings {
            current_theme: "garbage".to_string(),
            ..Default::default()
        };
        assert!(settings.current_theme_id().is_none());
    }
}
