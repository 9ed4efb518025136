//! folder-tint - layered folder color themes for content browsers
//!
//! Assigns display colors to folders from named, shareable themes. A theme
//! is a bundle of 32 color-scheme slots; each slot pairs a color with the
//! folder names and explicit paths it claims. Theme files are merged from
//! layered directories (plugin, host, project, user) and a single colorize
//! pass walks the host's content roots, giving every folder the color of
//! the first slot that matches it.
//!
//! The crate is host-agnostic: embed [`FolderColorizer`] with a
//! [`ContentRootProvider`] for the trees to scan and a [`FolderColorSink`]
//! for the colors it produces.

pub mod color;
pub mod colorize;
pub mod engine;
pub mod error;
pub mod logging;
pub mod paths;
pub mod registry;
pub mod resolver;
pub mod scheme;
pub mod settings;
pub mod store;
pub mod theme;
pub mod walker;
pub mod watcher;

pub use color::LinearColor;
pub use colorize::{ColorizeOutcome, FolderColorSink, StalePolicy};
pub use engine::FolderColorizer;
pub use error::{Error, Result};
pub use paths::{ThemeLayer, ThemeLayers};
pub use registry::{Subscription, ThemeRegistry, NO_THEME_NAME};
pub use scheme::{ColorScheme, SchemeSet, SCHEME_SLOTS};
pub use settings::UserSettings;
pub use store::ThemeStore;
pub use theme::{Theme, ThemeId, THEME_FILE_VERSION};
pub use walker::{ContentRoot, ContentRootProvider, DirectoryWalker};
pub use watcher::FolderSetWatcher;
