//! Error taxonomy for theme persistence and colorization
//!
//! Every error here is recoverable: the worst case is a theme list missing
//! an entry or an edit not persisted. The in-memory registry stays
//! internally consistent after any failure.

use crate::theme::ThemeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A theme file could not be parsed. Only surfaced by explicit actions
    /// like import; during directory scans the file is silently skipped.
    #[error("invalid theme file: {0}")]
    Parse(String),

    /// Saving or renaming would reuse a display name owned by another theme
    #[error("a theme named \"{0}\" already exists")]
    DuplicateName(String),

    /// Importing a theme whose id is already registered
    #[error("a theme with id {0} already exists")]
    DuplicateId(ThemeId),

    /// Display names must be non-empty to save
    #[error("theme name cannot be empty")]
    EmptyDisplayName,

    /// The id does not resolve to a registered theme
    #[error("unknown theme id {0}")]
    UnknownTheme(ThemeId),

    /// The active theme cannot be removed; apply another theme first
    #[error("cannot remove the active theme")]
    RemoveActiveTheme,

    /// The built-in fallback entry can never be removed
    #[error("cannot remove the built-in theme")]
    RemoveBuiltinTheme,

    /// The theme has never been saved, so there is no file to copy
    #[error("theme has no backing file")]
    NotMaterialized,

    /// A colorization pass was canceled cooperatively mid-walk
    #[error("colorization pass canceled")]
    Canceled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
