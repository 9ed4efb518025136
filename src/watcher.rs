//! File system watching for folder-set changes
//!
//! Uses the `notify` crate with debouncing to detect changes under the
//! content roots. Hosts without their own folder-change notifications poll
//! this watcher and call `on_folder_set_changed` on the engine when it
//! reports activity.

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crate::walker::ContentRoot;

/// Watches every included content root recursively with debouncing
///
/// Debounced with a 500ms delay so bulk operations (imports, source
/// control updates) coalesce into a single recolorize instead of one per
/// touched entry.
pub struct FolderSetWatcher {
    /// The debouncer handles watching and event coalescing
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    /// Receiver for debounced events
    rx: Receiver<Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    roots: Vec<PathBuf>,
}

impl FolderSetWatcher {
    pub fn new(roots: &[ContentRoot]) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let debounce_duration = Duration::from_millis(500);
        let mut debouncer = new_debouncer(debounce_duration, tx)?;

        let mut watched = Vec::new();
        for root in roots.iter().filter(|r| r.include) {
            debouncer
                .watcher()
                .watch(&root.physical_path, notify::RecursiveMode::Recursive)?;
            tracing::info!("Watching content root {}", root.physical_path.display());
            watched.push(root.physical_path.clone());
        }

        Ok(Self {
            _debouncer: debouncer,
            rx,
            roots: watched,
        })
    }

    /// The physical paths being watched
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Drain pending events; `true` means the folder set may have changed
    /// and a recolorize pass is warranted (non-blocking)
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;

        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    for event in events {
                        if self.should_ignore(&event.path) {
                            continue;
                        }
                        match event.kind {
                            DebouncedEventKind::Any => changed = true,
                            // Continuous events during active changes; the
                            // final Any event follows
                            DebouncedEventKind::AnyContinuous => continue,
                            _ => changed = true,
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Folder watcher error: {:?}", e);
                }
            }
        }

        if changed {
            tracing::debug!("Folder watcher detected changes");
        }
        changed
    }

    /// Hidden and source-control bookkeeping entries never affect the
    /// folder set the content browser shows
    fn should_ignore(&self, path: &Path) -> bool {
        let relative = self
            .roots
            .iter()
            .find_map(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);

        for component in relative.components() {
            if let std::path::Component::Normal(name) = component {
                let name = name.to_string_lossy();
                if name.starts_with('.') {
                    return true;
                }
            }
        }
        false
    }
}
