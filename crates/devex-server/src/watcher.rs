//! File watching for hot reload.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The JSON data file was written
    DataModified(PathBuf),

    /// Any other watched file (logo, background) was created or written
    AssetModified(PathBuf),

    /// A watched file was removed
    Deleted(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::DataModified(p) | WatchEvent::AssetModified(p) | WatchEvent::Deleted(p) => {
                p
            }
        }
    }

    /// Whether this event should trigger a regeneration.
    pub fn triggers_rebuild(&self) -> bool {
        !matches!(self, WatchEvent::Deleted(_))
    }
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher.
    ///
    /// `data_file` and every path in `extra` are watched. Files are watched through
    /// their parent directory so editors that save by rename are still seen.
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        data_file: &Path,
        extra: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let data_file = std::path::absolute(data_file)?;
        let targets = extra
            .iter()
            .map(std::path::absolute)
            .collect::<Result<Vec<_>, _>>()?;

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        let mut watched = HashSet::new();
        for target in std::iter::once(&data_file).chain(targets.iter()) {
            let (dir, mode) = if target.is_dir() {
                (target.as_path(), RecursiveMode::Recursive)
            } else {
                match target.parent() {
                    Some(parent) => (parent, RecursiveMode::NonRecursive),
                    None => continue,
                }
            };

            if dir.exists() && watched.insert(dir.to_path_buf()) {
                watcher.watch(dir, mode).map_err(std::io::Error::other)?;
                tracing::debug!("Watching {}", dir.display());
            }
        }

        std::thread::spawn(move || {
            let mut last_event_time = Instant::now() - Duration::from_secs(1);
            let debounce_duration = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                // Debounce rapid events
                let now = Instant::now();
                if now.duration_since(last_event_time) < debounce_duration {
                    continue;
                }

                let mut sent = false;
                for path in &event.paths {
                    if let Some(e) = classify_event(path, &event.kind, &data_file, &targets) {
                        sent = true;
                        if async_tx.blocking_send(e).is_err() {
                            return;
                        }
                    }
                }
                if sent {
                    last_event_time = now;
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event on `path` into a WatchEvent, ignoring unwatched paths.
fn classify_event(
    path: &Path,
    kind: &notify::EventKind,
    data_file: &Path,
    targets: &[PathBuf],
) -> Option<WatchEvent> {
    use notify::EventKind;

    let is_data = path == data_file;
    if !is_data && !targets.iter().any(|t| path == t || path.starts_with(t)) {
        return None;
    }

    match kind {
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        EventKind::Create(_) | EventKind::Modify(_) => {
            if is_data {
                Some(WatchEvent::DataModified(path.to_path_buf()))
            } else {
                Some(WatchEvent::AssetModified(path.to_path_buf()))
            }
        }
        _ => None,
    }
}
