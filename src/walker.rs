//! Recursive content-root enumeration producing display paths
//!
//! Physical directories are walked recursively and reported as
//! content-browser display paths: `<root name>/<relative path>` with `/`
//! separators. Plugins that declare a virtual content path are remapped
//! under that virtual root instead of their on-disk location, so schemes
//! can target plugin content by the path users actually see.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

/// One directory tree to scan, as supplied by the host's content discovery
#[derive(Debug, Clone)]
pub struct ContentRoot {
    /// On-disk directory to enumerate
    pub physical_path: PathBuf,
    /// Display name of the root (`"Game"`, or the plugin name)
    pub root_name: String,
    /// Virtual path shown by the content browser instead of `root_name`;
    /// discovered paths are remapped under it
    pub virtual_path: Option<String>,
    /// Roots with `include == false` are skipped entirely
    pub include: bool,
}

impl ContentRoot {
    pub fn new(physical_path: impl Into<PathBuf>, root_name: impl Into<String>) -> Self {
        Self {
            physical_path: physical_path.into(),
            root_name: root_name.into(),
            virtual_path: None,
            include: true,
        }
    }

    pub fn with_virtual_path(mut self, virtual_path: impl Into<String>) -> Self {
        self.virtual_path = Some(virtual_path.into());
        self
    }

    pub fn excluded(mut self) -> Self {
        self.include = false;
        self
    }

    /// Display prefix discovered folders are reported under
    fn display_prefix(&self) -> &str {
        self.virtual_path
            .as_deref()
            .unwrap_or(&self.root_name)
            .trim_matches('/')
    }
}

/// Collaborator that supplies the directory trees to colorize
pub trait ContentRootProvider {
    fn discovered_roots(&self) -> Vec<ContentRoot>;
}

/// A static root list is a valid provider (tests, simple hosts)
impl ContentRootProvider for Vec<ContentRoot> {
    fn discovered_roots(&self) -> Vec<ContentRoot> {
        self.clone()
    }
}

/// Recursive directory enumerator with an ignore list and a cooperative
/// cancellation flag (checked once per directory — enumeration dominates
/// the cost of a colorization pass on large trees)
#[derive(Default)]
pub struct DirectoryWalker<'a> {
    ignore: &'a [String],
    cancel: Option<&'a AtomicBool>,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new() -> Self {
        Self {
            ignore: &[],
            cancel: None,
        }
    }

    /// Skip any folder whose display path equals, or sits under, one of
    /// the given prefixes
    pub fn with_ignore_list(mut self, ignore: &'a [String]) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Enumerate every subdirectory of every included root
    ///
    /// Output order is deterministic: roots in caller order, entries sorted
    /// by name, parents before children. Unreadable directories are skipped
    /// with a log line. Returns [`Error::Canceled`] if the cancel flag is
    /// raised mid-walk.
    pub fn walk(&self, roots: &[ContentRoot]) -> Result<Vec<String>> {
        let mut dirs = Vec::new();
        for root in roots.iter().filter(|r| r.include) {
            self.scan_dir(&root.physical_path, root.display_prefix(), &mut dirs)?;
        }
        tracing::debug!("Discovered {} folders across {} roots", dirs.len(), roots.len());
        Ok(dirs)
    }

    fn scan_dir(&self, dir: &Path, display: &str, out: &mut Vec<String>) -> Result<()> {
        if let Some(cancel) = self.cancel {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::Canceled);
            }
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Skipping unreadable directory {}: {}", dir.display(), e);
                return Ok(());
            }
        };

        let mut subdirs: Vec<(String, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            // file_type() does not follow symlinks; a link back into the
            // tree would otherwise recurse without bound
            .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                Some((name, entry.path()))
            })
            .collect();
        subdirs.sort();

        for (name, path) in subdirs {
            let child_display = format!("{}/{}", display, name);
            if self.is_ignored(&child_display) {
                tracing::debug!("Ignoring folder {}", child_display);
                continue;
            }
            out.push(child_display.clone());
            self.scan_dir(&path, &child_display, out)?;
        }
        Ok(())
    }

    fn is_ignored(&self, display: &str) -> bool {
        self.ignore.iter().any(|prefix| {
            let prefix = prefix.trim_matches('/');
            !prefix.is_empty()
                && (display == prefix
                    || display
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/')))
        })
    }
}
