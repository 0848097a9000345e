//! Recursive filesystem watcher feeding the reload coordinator.
//!
//! Watches the whole served tree and forwards any change that passes the
//! [`WatchFilter`]. Which file changed is only logged; the coordinator just
//! needs to know that something did.

use crate::error::{CliError, Result};
use crate::reload::{ReloadCoordinator, WatchFilter};
use notify::event::{CreateKind, RemoveKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Live subscription to filesystem events under one root.
///
/// Events stop as soon as this is dropped.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `root` recursively.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Unwatchable`] if `root` is not an existing
    /// directory, or [`CliError::Watch`] if the subscription fails.
    pub fn new(
        root: &Path,
        filter: WatchFilter,
        coordinator: Arc<ReloadCoordinator>,
    ) -> Result<Self> {
        if !root.is_dir() {
            return Err(CliError::Unwatchable {
                path: root.to_path_buf(),
                reason: "not an existing directory".to_string(),
            });
        }

        // Event paths come back canonical on some platforms (macOS /private/var)
        let root = root.canonicalize().map_err(|e| CliError::Unwatchable {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        let event_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Some(path) = Self::relevant_path(&event, &event_root, &filter) {
                    debug!("Change detected: {}", path.display());
                    coordinator.notify_change();
                } else {
                    trace!("Ignored {:?} on {:?}", event.kind, event.paths);
                }
            }
            Err(e) => warn!("File watcher error: {}", e),
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        debug!("Watching {}", root.display());

        Ok(Self {
            _watcher: watcher,
            root,
        })
    }

    /// First path of `event` that should trigger a reload, if any.
    fn relevant_path<'e>(event: &'e Event, root: &Path, filter: &WatchFilter) -> Option<&'e Path> {
        match event.kind {
            EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder) => {
                return None
            }
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
            _ => return None,
        }

        event
            .paths
            .iter()
            .map(PathBuf::as_path)
            .find(|path| !path.is_dir() && filter.matches_under(root, path))
    }

    /// Canonical root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, DataChange, ModifyKind};

    fn filter(ignore: &[&str]) -> WatchFilter {
        let ignore: Vec<String> = ignore.iter().map(|s| s.to_string()).collect();
        WatchFilter::new(&["*".to_string()], &ignore, true).unwrap()
    }

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_relevant_event_kinds() {
        let root = PathBuf::from("/project");
        let f = filter(&[]);

        let created = event(EventKind::Create(CreateKind::File), "/project/app.js");
        assert!(FileWatcher::relevant_path(&created, &root, &f).is_some());

        let modified = event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/project/index.html",
        );
        assert!(FileWatcher::relevant_path(&modified, &root, &f).is_some());

        let removed = event(EventKind::Remove(RemoveKind::File), "/project/old.css");
        assert!(FileWatcher::relevant_path(&removed, &root, &f).is_some());

        let accessed = event(EventKind::Access(AccessKind::Any), "/project/index.html");
        assert!(FileWatcher::relevant_path(&accessed, &root, &f).is_none());
    }

    #[test]
    fn test_folder_events_ignored() {
        let root = PathBuf::from("/project");
        let f = filter(&[]);

        let created = event(EventKind::Create(CreateKind::Folder), "/project/assets");
        assert!(FileWatcher::relevant_path(&created, &root, &f).is_none());

        let removed = event(EventKind::Remove(RemoveKind::Folder), "/project/assets");
        assert!(FileWatcher::relevant_path(&removed, &root, &f).is_none());
    }

    #[test]
    fn test_filtered_paths_ignored() {
        let root = PathBuf::from("/project");
        let f = filter(&["*.css"]);

        let css = event(EventKind::Create(CreateKind::File), "/project/style.css");
        assert!(FileWatcher::relevant_path(&css, &root, &f).is_none());

        let dotfile = event(EventKind::Create(CreateKind::File), "/project/.env");
        assert!(FileWatcher::relevant_path(&dotfile, &root, &f).is_none());

        let outside = event(EventKind::Create(CreateKind::File), "/elsewhere/app.js");
        assert!(FileWatcher::relevant_path(&outside, &root, &f).is_none());
    }

    #[test]
    fn test_rename_reports_any_matching_path() {
        let root = PathBuf::from("/project");
        let f = filter(&["*.tmp"]);

        let rename = Event::new(EventKind::Modify(ModifyKind::Name(notify::event::RenameMode::Both)))
            .add_path(PathBuf::from("/project/page.tmp"))
            .add_path(PathBuf::from("/project/page.html"));
        assert_eq!(
            FileWatcher::relevant_path(&rename, &root, &f),
            Some(Path::new("/project/page.html"))
        );
    }

    #[tokio::test]
    async fn test_missing_root_is_unwatchable() {
        let coordinator = ReloadCoordinator::new(
            std::time::Duration::from_millis(10),
            tokio::runtime::Handle::current(),
        );
        let result = FileWatcher::new(Path::new("/definitely/not/here"), filter(&[]), coordinator);
        let err = result.err().expect("missing root must fail");
        assert!(matches!(err, CliError::Unwatchable { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
