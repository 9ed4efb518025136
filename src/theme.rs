//! Theme identity and the on-disk theme file format
//!
//! One JSON file per theme:
//!
//! ```json
//! {
//!   "Version": 1,
//!   "Id": "134380265FBB4A9CA00A1DC9770217B8",
//!   "DisplayName": "My Theme",
//!   "Schemes": {
//!     "0": { "SchemeColor": "(R=1.000000,G=0.000000,B=0.000000,A=1.000000)",
//!            "FolderNames": ["Art"], "ExplicitPaths": ["Game/Maps"] }
//!   }
//! }
//! ```
//!
//! Unknown top-level or per-scheme fields are ignored for forward
//! compatibility; absent scheme indices fall back to the built-in defaults.
//! During a directory scan only `Version`, `Id`, and `DisplayName` are read;
//! the full scheme payload is loaded lazily when a theme becomes active.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::color::LinearColor;
use crate::error::{Error, Result};
use crate::scheme::{SchemeSet, SCHEME_SLOTS};

/// Current theme file format version
pub const THEME_FILE_VERSION: u32 = 1;

/// Stable 128-bit theme identifier — the join key for layer merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThemeId(Uuid);

impl ThemeId {
    /// Reserved id of the built-in "No Theme" entry
    pub const NO_THEME: Self = Self(Uuid::from_u128(0x13438026_5FBB_4A9C_A00A_1DC9770217B8));

    /// Generate a fresh random id (for duplicated themes)
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from a 32-hex-digit GUID string; hyphenated forms also accepted
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::try_parse(s.trim()).ok().map(Self)
    }
}

impl fmt::Display for ThemeId {
    /// Canonical on-disk form: 32 uppercase hex digits, no hyphens
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Uuid::encode_buffer();
        f.write_str(self.0.simple().encode_upper(&mut buf))
    }
}

/// A named, identified bundle of [`SCHEME_SLOTS`] color-scheme slots
#[derive(Debug, Clone)]
pub struct Theme {
    /// Globally unique, stable across renames
    pub id: ThemeId,
    /// Human-readable name; must be non-empty to save
    pub display_name: String,
    /// Backing file; `None` until the theme is first materialized
    /// (freshly duplicated themes have no file yet)
    pub source_file: Option<PathBuf>,
    /// Schemes as last loaded from the backing file. Populated lazily when
    /// the theme is activated and dropped again when it stops being active.
    pub(crate) loaded_schemes: Option<Box<SchemeSet>>,
}

impl Theme {
    /// Create an in-memory theme with no backing file
    pub fn new(id: ThemeId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            source_file: None,
            loaded_schemes: None,
        }
    }

    /// Shallow-parse a theme file, reading identity fields only
    ///
    /// Fails on unreadable files, invalid JSON, a missing `Version`, `Id`,
    /// or `DisplayName` field, or an unparseable id. The `Schemes` payload
    /// is deliberately not touched here.
    pub fn read_descriptor(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| Error::Parse(format!("{}: {}", path.display(), e)))?;
        let header: ThemeFileHeader = serde_json::from_str(&data)
            .map_err(|e| Error::Parse(format!("{}: {}", path.display(), e)))?;

        let id = ThemeId::parse(&header.id)
            .ok_or_else(|| Error::Parse(format!("{}: bad theme id", path.display())))?;

        Ok(Self {
            id,
            display_name: header.display_name,
            source_file: Some(path.to_path_buf()),
            loaded_schemes: None,
        })
    }
}

#[derive(Deserialize)]
struct ThemeFileHeader {
    // Presence is required; the value itself is not checked so newer
    // writers remain readable.
    #[serde(rename = "Version")]
    #[allow(dead_code)]
    version: u32,
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "DisplayName")]
    display_name: String,
}

#[derive(Deserialize)]
struct ThemeFileSchemes {
    #[serde(rename = "Schemes", default)]
    schemes: HashMap<String, SchemeData>,
}

/// One scheme slot as stored on disk. All fields optional: a field that is
/// absent keeps the built-in default for that slot.
#[derive(Serialize, Deserialize, Default)]
struct SchemeData {
    #[serde(rename = "SchemeColor", skip_serializing_if = "Option::is_none")]
    scheme_color: Option<String>,
    #[serde(rename = "FolderNames", skip_serializing_if = "Option::is_none")]
    folder_names: Option<Vec<String>>,
    #[serde(rename = "ExplicitPaths", skip_serializing_if = "Option::is_none")]
    explicit_paths: Option<Vec<String>>,
}

/// Overlay the `Schemes` payload of `path` onto `schemes`
///
/// Slots (or slot fields) the file does not mention keep their current
/// values. A missing or malformed file leaves `schemes` untouched; a scheme
/// color that fails to parse keeps the slot's current color. Scheme keys
/// outside `0..SCHEME_SLOTS` are ignored.
pub(crate) fn apply_schemes_from_file(path: &Path, schemes: &mut SchemeSet) {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("Could not read theme file {}: {}", path.display(), e);
            return;
        }
    };

    let parsed: ThemeFileSchemes = match serde_json::from_str(&data) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Could not parse theme file {}: {}", path.display(), e);
            return;
        }
    };

    for (key, data) in parsed.schemes {
        let Some(slot) = key.parse::<usize>().ok().filter(|i| *i < SCHEME_SLOTS) else {
            tracing::debug!("Ignoring unknown scheme key {:?} in {}", key, path.display());
            continue;
        };

        let scheme = &mut schemes[slot];
        if let Some(color) = data.scheme_color.as_deref().and_then(LinearColor::parse) {
            scheme.color = color;
        }
        if let Some(names) = data.folder_names {
            scheme.set_folder_names(names);
        }
        if let Some(paths) = data.explicit_paths {
            scheme.set_explicit_paths(paths);
        }
    }
}

/// Serialize a theme to the canonical JSON document
///
/// Every slot is written, with `SchemeColor` and both (sorted) rule arrays
/// present, and slot keys emitted in index order.
pub(crate) fn theme_file_json(id: ThemeId, display_name: &str, schemes: &SchemeSet) -> String {
    #[derive(Serialize)]
    struct ThemeFileOut<'a> {
        #[serde(rename = "Version")]
        version: u32,
        #[serde(rename = "Id")]
        id: String,
        #[serde(rename = "DisplayName")]
        display_name: &'a str,
        #[serde(rename = "Schemes")]
        schemes: SchemesOut<'a>,
    }

    struct SchemesOut<'a>(&'a SchemeSet);

    impl Serialize for SchemesOut<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(SCHEME_SLOTS))?;
            for (index, scheme) in self.0.iter().enumerate() {
                let data = SchemeData {
                    scheme_color: Some(scheme.color.to_string()),
                    folder_names: Some(scheme.folder_names.iter().cloned().collect()),
                    explicit_paths: Some(scheme.explicit_paths.iter().cloned().collect()),
                };
                map.serialize_entry(&index.to_string(), &data)?;
            }
            map.end()
        }
    }

    let out = ThemeFileOut {
        version: THEME_FILE_VERSION,
        id: id.to_string(),
        display_name,
        schemes: SchemesOut(schemes),
    };

    // Serialization of this shape cannot fail
    serde_json::to_string_pretty(&out).unwrap_or_default()
}
