//! The colorizer engine: ties registry, store, settings, and the host's
//! collaborators together
//!
//! [`FolderColorizer`] is the facade hosts embed. It is generic over the
//! two host-side seams: a [`ContentRootProvider`] that says which
//! directory trees exist, and a [`FolderColorSink`] that receives the
//! per-folder colors. Everything in between — layered theme loading,
//! activation, the walk, the pass — lives here.
//!
//! Refresh requests are coalesced: a request that arrives while a pass is
//! running marks the pass stale and at most one follow-up pass runs after
//! it, no matter how many requests piled up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::colorize::{self, ColorizeOutcome, FolderColorSink, StalePolicy};
use crate::error::{Error, Result};
use crate::paths::ThemeLayer;
use crate::registry::{Subscription, ThemeRegistry};
use crate::scheme::SchemeSet;
use crate::settings::UserSettings;
use crate::store::ThemeStore;
use crate::theme::{Theme, ThemeId};
use crate::walker::{ContentRootProvider, DirectoryWalker};

pub struct FolderColorizer<P: ContentRootProvider, S: FolderColorSink> {
    registry: ThemeRegistry,
    store: ThemeStore,
    settings: UserSettings,
    roots: P,
    sink: S,
    /// Raised by [`cancel_refresh`](Self::cancel_refresh) (possibly from
    /// another thread via [`cancel_handle`](Self::cancel_handle)); the
    /// walker checks it once per directory
    cancel: Arc<AtomicBool>,
    pass_running: bool,
    pass_pending: bool,
    last_outcome: ColorizeOutcome,
}

impl<P: ContentRootProvider, S: FolderColorSink> FolderColorizer<P, S> {
    pub fn new(store: ThemeStore, settings: UserSettings, roots: P, sink: S) -> Self {
        Self {
            registry: ThemeRegistry::new(),
            store,
            settings,
            roots,
            sink,
            cancel: Arc::new(AtomicBool::new(false)),
            pass_running: false,
            pass_pending: false,
            last_outcome: ColorizeOutcome::default(),
        }
    }

    /// Restore the persisted theme, scan all layers, and run the first pass
    ///
    /// The persisted id is restored before the scan so that activation
    /// resolves against the freshly merged theme list; if the id no longer
    /// exists the registry falls back to the built-in theme.
    pub fn startup(&mut self) {
        if let Some(id) = self.settings.current_theme_id() {
            self.registry.set_active_id_direct(id);
        }
        self.store.load_all(&mut self.registry);
        self.settings
            .set_current_theme(self.registry.active_theme_id());
        self.request_refresh();
    }

    /// Rescan every theme layer, keeping the active theme where possible
    pub fn reload_themes(&mut self) {
        self.store.load_all(&mut self.registry);
        self.settings
            .set_current_theme(self.registry.active_theme_id());
        if self.settings.live_update {
            self.request_refresh();
        }
    }

    /// Activate a theme and (with live update on) recolorize
    ///
    /// An unknown id degrades to a forced refresh of the current theme.
    pub fn apply_theme(&mut self, id: ThemeId) -> Result<()> {
        self.store.activate(&mut self.registry, id)?;
        self.settings
            .set_current_theme(self.registry.active_theme_id());
        if self.settings.live_update {
            self.request_refresh();
        }
        Ok(())
    }

    /// Ask for a colorize pass now (or, if one is running, right after it)
    pub fn request_refresh(&mut self) {
        self.pass_pending = true;
        if self.pass_running {
            return;
        }
        self.pass_running = true;
        while self.pass_pending {
            self.pass_pending = false;
            self.run_pass_once();
        }
        self.pass_running = false;
    }

    /// Abort the in-flight pass at the next directory boundary
    pub fn cancel_refresh(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Flag another thread can raise to abort an in-flight pass
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn run_pass_once(&mut self) {
        self.cancel.store(false, Ordering::Relaxed);
        let roots = self.roots.discovered_roots();
        let walker = DirectoryWalker::new()
            .with_ignore_list(&self.settings.folder_ignore_list)
            .with_cancel_flag(&self.cancel);

        let dirs = match walker.walk(&roots) {
            Ok(dirs) => dirs,
            Err(Error::Canceled) => {
                tracing::debug!("Colorize pass canceled mid-walk");
                return;
            }
            Err(e) => {
                tracing::warn!("Folder enumeration failed: {}", e);
                return;
            }
        };

        self.last_outcome = colorize::run_pass(
            &dirs,
            self.registry.active_schemes(),
            self.settings.stale_policy,
            &mut self.sink,
        );
    }

    /// Notification from the host that folders were created, renamed, or
    /// deleted. Recolorizes unless live update is off.
    pub fn on_folder_set_changed(&mut self) {
        if self.settings.live_update {
            self.request_refresh();
        } else {
            tracing::debug!("Folder set changed, live update disabled");
        }
    }

    // --- theme management -------------------------------------------------

    /// Write the active theme into the user layer under its display name
    pub fn save_current_theme(&mut self) -> Result<std::path::PathBuf> {
        self.store.save_current_theme(&mut self.registry)
    }

    /// Write the active theme to an explicit path
    pub fn save_current_theme_as(&mut self, target: &std::path::Path) -> Result<()> {
        self.store.save_current_theme_as(&mut self.registry, target)
    }

    /// Rename the active theme (in memory; save to persist)
    pub fn set_display_name(&mut self, name: &str) -> Result<()> {
        self.store.set_display_name(&mut self.registry, name)
    }

    /// Duplicate the active theme and activate the copy
    pub fn duplicate_active_theme(&mut self) -> Result<ThemeId> {
        let id = self.store.duplicate_active_theme(&mut self.registry);
        self.apply_theme(id)?;
        Ok(id)
    }

    /// Remove a non-active theme and delete its backing file
    pub fn remove_theme(&mut self, id: ThemeId) -> Result<()> {
        self.store.remove_theme(&mut self.registry, id)
    }

    /// Copy an external theme file into the user layer and register it
    pub fn import_theme(&mut self, source: &std::path::Path) -> Result<ThemeId> {
        self.store.import_theme(&mut self.registry, source)
    }

    /// Copy the active theme's backing file to `dest`
    pub fn export_active_theme(&self, dest: &std::path::Path) -> Result<()> {
        self.store.export_theme(&self.registry, dest)
    }

    /// Which layer the active theme is stored in, if saved
    pub fn active_theme_layer(&self) -> Option<ThemeLayer> {
        self.store.active_theme_layer(&self.registry)
    }

    // --- settings ---------------------------------------------------------

    pub fn set_live_update(&mut self, enabled: bool) -> Result<()> {
        self.settings.live_update = enabled;
        self.save_settings()?;
        if enabled {
            self.request_refresh();
        }
        Ok(())
    }

    pub fn set_stale_policy(&mut self, policy: StalePolicy) -> Result<()> {
        self.settings.stale_policy = policy;
        self.save_settings()?;
        if self.settings.live_update {
            self.request_refresh();
        }
        Ok(())
    }

    pub fn set_folder_ignore_list(&mut self, ignore: Vec<String>) -> Result<()> {
        self.settings.folder_ignore_list = ignore;
        self.save_settings()?;
        if self.settings.live_update {
            self.request_refresh();
        }
        Ok(())
    }

    fn save_settings(&self) -> Result<()> {
        match self.store.settings_file_path() {
            Some(path) => self.settings.save_to(path),
            None => Ok(()),
        }
    }

    // --- accessors --------------------------------------------------------

    pub fn themes(&self) -> &[Theme] {
        self.registry.themes()
    }

    pub fn active_theme(&self) -> &Theme {
        self.registry.active_theme()
    }

    pub fn active_theme_id(&self) -> ThemeId {
        self.registry.active_theme_id()
    }

    /// The editing surface: changes apply on the next pass and persist
    /// only on an explicit save
    pub fn active_schemes_mut(&mut self) -> &mut SchemeSet {
        self.registry.active_schemes_mut()
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ThemeRegistry {
        &mut self.registry
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn last_outcome(&self) -> &ColorizeOutcome {
        &self.last_outcome
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn subscribe(&mut self, callback: impl Fn(ThemeId) + 'static) -> Subscription {
        self.registry.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.registry.unsubscribe(subscription);
    }
}
