//! Folder-path → color scheme matching
//!
//! Resolution walks the scheme array in slot order (index 0 first). Within
//! a scheme an explicit-path match is checked before a leaf-name match; the
//! first scheme that matches by either rule wins and later slots are never
//! consulted. Scheme ordering is therefore part of the resolution contract
//! and is preserved on load/save.

use crate::color::LinearColor;
use crate::scheme::{ColorScheme, SchemeSet};

/// Normalize a display path: `\` separators become `/`, trailing slashes
/// are dropped. Matching is case-sensitive.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.trim_end_matches('/').to_string()
}

/// Leaf folder name of a display path
fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// True if `scheme` claims `path` by explicit path or folder name
pub fn matches_scheme(path: &str, scheme: &ColorScheme) -> bool {
    let path = normalize_path(path);
    scheme.explicit_paths.contains(path.as_str()) || scheme.folder_names.contains(leaf_name(&path))
}

/// Index of the first scheme slot matching `path`, if any
pub fn match_scheme_index(path: &str, schemes: &SchemeSet) -> Option<usize> {
    schemes.iter().position(|scheme| matches_scheme(path, scheme))
}

/// Resolved color for a folder: the color of the first matching slot
///
/// `None` means no scheme matched — distinct from a scheme that explicitly
/// assigns a transparent color. Whether an unmatched folder keeps or loses
/// a previously applied color is the caller's policy (see the colorize
/// pass).
pub fn match_color(path: &str, schemes: &SchemeSet) -> Option<LinearColor> {
    match_scheme_index(path, schemes).map(|index| schemes[index].color)
}
