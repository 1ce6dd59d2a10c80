//! Configuration file watcher for hot reload.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::store::ConfigStore;

/// A watcher that monitors the configuration file for changes.
///
/// The parent directory is watched rather than the file itself so that
/// editors which save through a rename are still picked up.
pub struct ConfigWatcher {
    store: Arc<ConfigStore>,
}

impl ConfigWatcher {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self
            .store
            .path()
            .map(Path::to_path_buf)
            .ok_or_else(|| notify::Error::generic("configuration store has no backing file"))?;
        let file_name: OsString = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| notify::Error::generic("configuration path has no file name"))?;
        let dir = watch_dir(&path);

        let store = self.store.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    if !event.paths.iter().any(|p| p.file_name() == Some(file_name.as_os_str())) {
                        return;
                    }
                    tracing::info!(paths = ?event.paths, "Config file change detected, reloading...");
                    // Failures are logged by the store, which keeps the previous snapshot.
                    let _ = store.reload();
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Config watcher started");
        Ok(watcher)
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
