//! Layered theme loading, merging, and persistence
//!
//! Theme files are scanned from the layered directories in increasing
//! precedence order and merged into the registry by id: the first scan of
//! an id contributes the whole entry, a later scan of the same id only
//! moves the source-file pointer (so the highest-precedence layer wins the
//! location edits are written to, mimicking config file hierarchies).
//! Scheme payloads are never parsed during the scan — they load lazily
//! when a theme becomes active.
//!
//! Files that cannot be parsed are skipped silently (log line only); the
//! theme list simply omits them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths::{ThemeLayer, ThemeLayers};
use crate::registry::ThemeRegistry;
use crate::settings::UserSettings;
use crate::theme::{self, Theme, ThemeId};

/// Loads themes from the layered directories and writes edits back to the
/// user layer
pub struct ThemeStore {
    layers: ThemeLayers,
    /// Where the active theme id is persisted; `None` disables persistence
    settings_file: Option<PathBuf>,
}

impl ThemeStore {
    pub fn new(layers: ThemeLayers) -> Self {
        Self {
            layers,
            settings_file: crate::paths::settings_file(),
        }
    }

    /// Persist the active theme id to `path` instead of the default
    /// settings location
    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    pub fn layers(&self) -> &ThemeLayers {
        &self.layers
    }

    pub(crate) fn settings_file_path(&self) -> Option<&Path> {
        self.settings_file.as_deref()
    }

    /// Rescan every layer and rebuild the registry's theme list, then
    /// re-activate the (still valid) current theme
    ///
    /// In-memory-only themes that were never saved do not survive a
    /// rescan.
    pub fn load_all(&self, registry: &mut ThemeRegistry) {
        registry.clear_themes();
        for dir in self.layers.dirs() {
            self.load_dir(registry, dir);
        }
        registry.ensure_valid_active();

        let active = registry.active_theme_id();
        if let Err(e) = self.activate(registry, active) {
            tracing::warn!("Could not re-activate theme {}: {}", active, e);
        }
        tracing::info!("Loaded {} themes", registry.themes().len());
    }

    fn load_dir(&self, registry: &mut ThemeRegistry, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            // Layer directories are optional; missing ones are normal
            Err(_) => return,
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        for file in files {
            match Theme::read_descriptor(&file) {
                Ok(descriptor) => registry.merge_scanned(descriptor),
                Err(e) => tracing::debug!("Skipping theme file: {}", e),
            }
        }
    }

    /// Make `id` the active theme
    ///
    /// Lazily loads the theme's schemes (falling back to the built-in
    /// defaults for slots its file does not define), copies them into the
    /// registry's active array, and persists only the id reference to user
    /// settings. Always re-broadcasts the theme-changed notification, even
    /// for the already-active id — an unknown id degrades to that forced
    /// refresh of the current theme.
    pub fn activate(&self, registry: &mut ThemeRegistry, id: ThemeId) -> Result<()> {
        if registry.contains(id) && id != registry.active_theme_id() {
            let outgoing = registry.active_theme_id();
            if let Some(previous) = registry.theme_mut(outgoing) {
                // Unload the outgoing theme's lazily loaded copy
                previous.loaded_schemes = None;
            }
            registry.set_active_id_direct(id);
            // Fire-and-forget: a failed settings write must not leave the
            // registry half-switched (id moved, schemes not loaded)
            if let Err(e) = self.persist_active_id(id) {
                tracing::warn!("Could not persist active theme id: {}", e);
            }
        }

        let schemes = self.load_active_schemes(registry);
        registry.set_active_schemes(schemes);
        registry.notify_theme_changed();
        Ok(())
    }

    fn persist_active_id(&self, id: ThemeId) -> Result<()> {
        let Some(path) = &self.settings_file else {
            tracing::debug!("No settings file configured, active theme not persisted");
            return Ok(());
        };
        let mut settings = UserSettings::load_from(path);
        settings.set_current_theme(id);
        settings.save_to(path)
    }

    fn load_active_schemes(&self, registry: &mut ThemeRegistry) -> Box<crate::scheme::SchemeSet> {
        let active_id = registry.active_theme_id();

        // Reuse the cached copy from a previous activation, or the value
        // copy an in-memory duplicate was created with
        if let Some(schemes) = registry
            .theme(active_id)
            .and_then(|theme| theme.loaded_schemes.clone())
        {
            return schemes;
        }

        let mut schemes = Box::new(registry.default_schemes().clone());
        if let Some(file) = registry.active_theme().source_file.clone() {
            theme::apply_schemes_from_file(&file, &mut schemes);
        }
        if let Some(theme) = registry.theme_mut(active_id) {
            theme.loaded_schemes = Some(schemes.clone());
        }
        schemes
    }

    /// Serialize the active theme's current schemes to `target`
    ///
    /// Writes the in-effect `active_schemes` — not the stale lazily loaded
    /// copy. When the theme was previously stored elsewhere (renames move
    /// the file, since the filename mirrors the display name) the old file
    /// is deleted only after the new write succeeded.
    pub fn save_current_theme_as(&self, registry: &mut ThemeRegistry, target: &Path) -> Result<()> {
        let active_id = registry.active_theme_id();
        let display_name = registry.active_theme().display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(Error::EmptyDisplayName);
        }
        if registry
            .themes()
            .iter()
            .any(|t| t.id != active_id && t.display_name == display_name)
        {
            return Err(Error::DuplicateName(display_name));
        }

        let json = theme::theme_file_json(active_id, &display_name, registry.active_schemes());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, json)?;
        tracing::info!("Saved theme \"{}\" to {}", display_name, target.display());

        let previous = registry.active_theme().source_file.clone();
        if let Some(previous) = previous.filter(|p| p != target) {
            if let Err(e) = fs::remove_file(&previous) {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(
                        "Could not delete old theme file {}: {}",
                        previous.display(),
                        e
                    );
                }
            }
        }

        let saved = Box::new(registry.active_schemes().clone());
        if let Some(theme) = registry.theme_mut(active_id) {
            theme.source_file = Some(target.to_path_buf());
            theme.loaded_schemes = Some(saved);
        }
        Ok(())
    }

    /// Save the active theme into the user layer under its display name
    pub fn save_current_theme(&self, registry: &mut ThemeRegistry) -> Result<PathBuf> {
        let name = registry.active_theme().display_name.trim().to_string();
        if name.is_empty() {
            return Err(Error::EmptyDisplayName);
        }
        let target = self.layers.user_dir().join(format!("{}.json", name));
        self.save_current_theme_as(registry, &target)?;
        Ok(target)
    }

    /// Rename the active theme; rejected for empty names and names already
    /// used by a different theme id. No file is touched until the next
    /// save.
    pub fn set_display_name(&self, registry: &mut ThemeRegistry, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyDisplayName);
        }
        let active_id = registry.active_theme_id();
        if registry
            .themes()
            .iter()
            .any(|t| t.id != active_id && t.display_name == name)
        {
            return Err(Error::DuplicateName(name.to_string()));
        }
        if let Some(theme) = registry.theme_mut(active_id) {
            theme.display_name = name.to_string();
        }
        Ok(())
    }

    /// Duplicate the active theme under a fresh id
    ///
    /// The new theme takes a value copy of the in-effect schemes — edits
    /// to the duplicate never leak into the original — and has no backing
    /// file until it is first saved.
    pub fn duplicate_active_theme(&self, registry: &mut ThemeRegistry) -> ThemeId {
        let new_id = ThemeId::random();
        let name = format!("{} - Copy", registry.active_theme().display_name);
        let mut duplicate = Theme::new(new_id, name);
        duplicate.loaded_schemes = Some(Box::new(registry.active_schemes().clone()));
        registry.insert(duplicate);
        tracing::info!("Duplicated active theme as {}", new_id);
        new_id
    }

    /// Remove a theme and delete its backing file
    ///
    /// The active theme and the built-in entry are rejected; apply another
    /// theme first. A file-deletion failure leaves the registry entry in
    /// place so the in-memory view stays consistent with disk.
    pub fn remove_theme(&self, registry: &mut ThemeRegistry, id: ThemeId) -> Result<()> {
        if id == registry.active_theme_id() {
            return Err(Error::RemoveActiveTheme);
        }
        if id == ThemeId::NO_THEME {
            return Err(Error::RemoveBuiltinTheme);
        }
        let theme = registry.theme(id).ok_or(Error::UnknownTheme(id))?;

        if let Some(file) = theme.source_file.clone() {
            match fs::remove_file(&file) {
                Ok(()) => tracing::info!("Deleted theme file {}", file.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        registry.remove(id);
        Ok(())
    }

    /// Copy an external theme file into the user layer and register it
    ///
    /// Rejected when the file does not parse, or when its id or display
    /// name collides with an existing theme (imports must not overwrite).
    pub fn import_theme(&self, registry: &mut ThemeRegistry, source: &Path) -> Result<ThemeId> {
        let mut descriptor = Theme::read_descriptor(source)?;
        if registry.contains(descriptor.id) {
            return Err(Error::DuplicateId(descriptor.id));
        }
        if registry.theme_by_name(&descriptor.display_name).is_some() {
            return Err(Error::DuplicateName(descriptor.display_name.clone()));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| Error::Parse("import source has no file name".to_string()))?;
        fs::create_dir_all(self.layers.user_dir())?;
        let dest = self.layers.user_dir().join(file_name);
        if dest.exists() {
            return Err(Error::DuplicateName(
                dest.file_stem().unwrap_or_default().to_string_lossy().into_owned(),
            ));
        }
        fs::copy(source, &dest)?;
        descriptor.source_file = Some(dest);

        let id = descriptor.id;
        registry.insert(descriptor);
        tracing::info!("Imported theme {} from {}", id, source.display());
        Ok(id)
    }

    /// Copy the active theme's backing file to `dest`
    pub fn export_theme(&self, registry: &ThemeRegistry, dest: &Path) -> Result<()> {
        let source = registry
            .active_theme()
            .source_file
            .clone()
            .ok_or(Error::NotMaterialized)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, dest)?;
        tracing::info!("Exported theme to {}", dest.display());
        Ok(())
    }

    /// Which layer the active theme's backing file lives in, if saved.
    /// Non-user layers are read-only; UIs use this to disable editing.
    pub fn active_theme_layer(&self, registry: &ThemeRegistry) -> Option<ThemeLayer> {
        let file = registry.active_theme().source_file.as_deref()?;
        self.layers.classify(file)
    }
}
