//! Centralized configuration and theme-layer paths
//!
//! Per-user files live under:
//! - Unix/macOS: `~/.config/folder-tint/`
//! - Windows: `%APPDATA%\folder-tint\`
//!
//! Theme files come from up to four layered directories with override
//! precedence (low→high): plugin-bundled, host-application-bundled,
//! project-bundled, then the per-user themes directory. Every non-user
//! layer shares the same relative subpath suffix under its root.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::error::Result;

const APP_DIR: &str = "folder-tint";

/// Relative subpath every bundled theme layer shares
pub const THEMES_SUBDIR: &str = "themes/folders";

/// Base config directory
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/folder-tint`
///   - Else: `~/.config/folder-tint`
///
/// Windows:
///   - `%APPDATA%\folder-tint`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/folder-tint/themes/`
pub fn user_themes_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("themes"))
}

/// `~/.config/folder-tint/settings.yaml`
pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.yaml"))
}

/// `~/.config/folder-tint/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Ensure the user themes dir exists, returning it
pub fn ensure_user_themes_dir() -> Result<Option<PathBuf>> {
    let Some(dir) = user_themes_dir() else {
        return Ok(None);
    };
    ensure_dir(&dir)?;
    Ok(Some(dir))
}

/// Ensure the logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<Option<PathBuf>> {
    let Some(dir) = logs_dir() else {
        return Ok(None);
    };
    ensure_dir(&dir)?;
    Ok(Some(dir))
}

/// Which layer a theme's backing file lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeLayer {
    Plugin,
    Host,
    Project,
    User,
}

/// Theme-file source directories in increasing precedence order
///
/// The user layer is always last, so per-user themes win ties on shared
/// ids, and it is the only layer edits are written to.
#[derive(Debug, Clone)]
pub struct ThemeLayers {
    plugin: Option<PathBuf>,
    host: Option<PathBuf>,
    project: Option<PathBuf>,
    user: PathBuf,
}

impl ThemeLayers {
    /// Standard layout: each bundled root contributes
    /// `<root>/themes/folders`, plus the per-user themes directory
    pub fn discover(
        plugin_root: Option<&Path>,
        host_root: Option<&Path>,
        project_root: Option<&Path>,
    ) -> Option<Self> {
        Some(Self {
            plugin: plugin_root.map(|r| r.join(THEMES_SUBDIR)),
            host: host_root.map(|r| r.join(THEMES_SUBDIR)),
            project: project_root.map(|r| r.join(THEMES_SUBDIR)),
            user: user_themes_dir()?,
        })
    }

    /// Explicit theme directories (already including any subpath)
    pub fn new(
        plugin: Option<PathBuf>,
        host: Option<PathBuf>,
        project: Option<PathBuf>,
        user: PathBuf,
    ) -> Self {
        Self {
            plugin,
            host,
            project,
            user,
        }
    }

    /// A single user directory and nothing else
    pub fn user_only(user: PathBuf) -> Self {
        Self::new(None, None, None, user)
    }

    /// Scan order: plugin, host, project, user
    pub fn dirs(&self) -> Vec<&Path> {
        [
            self.plugin.as_deref(),
            self.host.as_deref(),
            self.project.as_deref(),
            Some(self.user.as_path()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// The writable layer edits and imports are saved to
    pub fn user_dir(&self) -> &Path {
        &self.user
    }

    /// Classify which layer a theme file belongs to
    pub fn classify(&self, file: &Path) -> Option<ThemeLayer> {
        if file.starts_with(&self.user) {
            return Some(ThemeLayer::User);
        }
        if let Some(project) = &self.project {
            if file.starts_with(project) {
                return Some(ThemeLayer::Project);
            }
        }
        if let Some(host) = &self.host {
            if file.starts_with(host) {
                return Some(ThemeLayer::Host);
            }
        }
        if let Some(plugin) = &self.plugin {
            if file.starts_with(plugin) {
                return Some(ThemeLayer::Plugin);
            }
        }
        None
    }
}
