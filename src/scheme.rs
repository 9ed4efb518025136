//! Color scheme slots — the rule unit of a theme
//!
//! A theme always carries exactly [`SCHEME_SLOTS`] schemes; the slot index
//! is the scheme's identity within the theme and also its matching
//! priority (lower index wins).

use std::collections::BTreeSet;

use crate::color::LinearColor;

/// Number of scheme slots in every theme
pub const SCHEME_SLOTS: usize = 32;

/// Fixed-size ordered scheme array
pub type SchemeSet = [ColorScheme; SCHEME_SLOTS];

/// Build an all-default scheme set (every slot empty and transparent)
pub fn empty_scheme_set() -> SchemeSet {
    std::array::from_fn(|_| ColorScheme::default())
}

/// One rule slot: folder names plus explicit paths mapping to a color
///
/// Both rule lists are kept trimmed, deduplicated, and sorted so that
/// serialization is stable. Equality is structural.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorScheme {
    /// Bare folder (leaf) names that use this color
    pub folder_names: BTreeSet<String>,
    /// Full display paths that use this color
    pub explicit_paths: BTreeSet<String>,
    /// The color applied to matching folders
    pub color: LinearColor,
}

impl ColorScheme {
    /// True if the scheme has no rules and can never match a folder
    pub fn is_empty(&self) -> bool {
        self.folder_names.is_empty() && self.explicit_paths.is_empty()
    }

    /// Replace the folder-name list, trimming entries and dropping empties
    pub fn set_folder_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.folder_names = normalized_set(names, false);
    }

    /// Replace the explicit-path list
    ///
    /// Entries are trimmed and separator-normalized (`\` becomes `/`,
    /// trailing slashes dropped) so lookups can compare exactly.
    pub fn set_explicit_paths<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.explicit_paths = normalized_set(paths, true);
    }
}

fn normalized_set<I, S>(items: I, as_path: bool) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| {
            let s = s.as_ref().trim();
            if as_path {
                crate::resolver::normalize_path(s)
            } else {
                s.to_string()
            }
        })
        .filter(|s| !s.is_empty())
        .collect()
}
