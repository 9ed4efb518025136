//! Process-wide theme state, held as an explicit instance
//!
//! The registry owns the merged theme list, the active theme id, and the
//! materialized `active_schemes` copy that edits apply to. It is passed by
//! reference to the store and the engine — there is no ambient global.
//!
//! Invariants:
//! - the built-in "No Theme" entry ([`ThemeId::NO_THEME`]) is always
//!   present and can never be removed;
//! - `active_theme_id` always resolves to an entry in the theme list; a
//!   dangling id is reset to the built-in default.

use crate::scheme::{empty_scheme_set, ColorScheme, SchemeSet};
use crate::theme::{Theme, ThemeId};

/// Display name of the built-in fallback entry
pub const NO_THEME_NAME: &str = "No Theme";

/// Cancellation handle returned by [`ThemeRegistry::subscribe`]
#[derive(Debug)]
pub struct Subscription(u64);

/// Process-wide theme registry
pub struct ThemeRegistry {
    themes: Vec<Theme>,
    active_theme_id: ThemeId,
    /// The in-memory schemes currently in effect. A value copy — editing it
    /// never mutates a persisted theme until an explicit save.
    active_schemes: Box<SchemeSet>,
    /// Per-slot fallbacks used when a theme file omits a slot
    default_schemes: Box<SchemeSet>,
    subscribers: Vec<(u64, Box<dyn Fn(ThemeId)>)>,
    next_subscription: u64,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            themes: Vec::new(),
            active_theme_id: ThemeId::NO_THEME,
            active_schemes: Box::new(empty_scheme_set()),
            default_schemes: Box::new(empty_scheme_set()),
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        registry.ensure_valid_active();
        registry
    }

    /// All known themes, in merge/insertion order
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Look up a theme by id
    pub fn theme(&self, id: ThemeId) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub(crate) fn theme_mut(&mut self, id: ThemeId) -> Option<&mut Theme> {
        self.themes.iter_mut().find(|t| t.id == id)
    }

    pub fn contains(&self, id: ThemeId) -> bool {
        self.theme(id).is_some()
    }

    /// Look up a theme by display name
    pub fn theme_by_name(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.display_name == name)
    }

    pub fn active_theme_id(&self) -> ThemeId {
        self.active_theme_id
    }

    /// The active theme entry; the registry invariants keep this resolvable
    pub fn active_theme(&self) -> &Theme {
        self.theme(self.active_theme_id)
            .or_else(|| self.theme(ThemeId::NO_THEME))
            .expect("registry always contains the built-in theme")
    }

    /// The 32 schemes currently in effect
    pub fn active_schemes(&self) -> &SchemeSet {
        &self.active_schemes
    }

    /// Mutable access to the in-effect schemes (the editing surface).
    /// Changes stay in memory until the theme is explicitly saved.
    pub fn active_schemes_mut(&mut self) -> &mut SchemeSet {
        &mut self.active_schemes
    }

    /// A single in-effect scheme slot
    pub fn scheme(&self, slot: usize) -> &ColorScheme {
        &self.active_schemes[slot]
    }

    /// Override the built-in fallback for one slot
    pub fn set_default_scheme(&mut self, slot: usize, scheme: ColorScheme) {
        self.default_schemes[slot] = scheme;
    }

    pub(crate) fn default_schemes(&self) -> &SchemeSet {
        &self.default_schemes
    }

    pub(crate) fn set_active_schemes(&mut self, schemes: Box<SchemeSet>) {
        self.active_schemes = schemes;
    }

    /// Set the active id without activation side effects. Used when
    /// restoring the persisted id before the first theme scan; a dangling
    /// id is repaired by [`ensure_valid_active`](Self::ensure_valid_active).
    pub fn set_active_id_direct(&mut self, id: ThemeId) {
        self.active_theme_id = id;
    }

    /// Insert a freshly scanned theme, or merge it onto an existing entry
    ///
    /// When the id is already known only the source-file pointer moves —
    /// the later-scanned directory wins the location edits are written to.
    pub(crate) fn merge_scanned(&mut self, theme: Theme) {
        match self.theme_mut(theme.id) {
            Some(existing) => {
                tracing::debug!(
                    "Theme {} overridden by {:?}",
                    theme.id,
                    theme.source_file
                );
                existing.source_file = theme.source_file;
            }
            None => self.themes.push(theme),
        }
    }

    pub(crate) fn insert(&mut self, theme: Theme) {
        self.themes.push(theme);
    }

    pub(crate) fn remove(&mut self, id: ThemeId) {
        self.themes.retain(|t| t.id != id);
    }

    pub(crate) fn clear_themes(&mut self) {
        self.themes.clear();
    }

    /// Reinsert the built-in entry if missing and repair a dangling active
    /// id by resetting it to the built-in default
    pub fn ensure_valid_active(&mut self) {
        if !self.contains(ThemeId::NO_THEME) {
            self.themes
                .push(Theme::new(ThemeId::NO_THEME, NO_THEME_NAME));
        }
        if !self.contains(self.active_theme_id) {
            tracing::info!(
                "Active theme {} not found, falling back to the built-in theme",
                self.active_theme_id
            );
            self.active_theme_id = ThemeId::NO_THEME;
        }
    }

    /// Register a theme-changed observer; fired after every activation,
    /// including re-applies of the already-active id
    pub fn subscribe(&mut self, callback: impl Fn(ThemeId) + 'static) -> Subscription {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        Subscription(id)
    }

    /// Remove a previously registered observer
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers.retain(|(id, _)| *id != subscription.0);
    }

    pub(crate) fn notify_theme_changed(&self) {
        for (_, callback) in &self.subscribers {
            callback(self.active_theme_id);
        }
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
