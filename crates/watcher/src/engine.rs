//! The polling watch engine
//!
//! Owns the tables of tracked files and directories and derives change
//! events by diffing fresh metadata snapshots against the stored baselines.
//! One logical thread owns an [`Engine`]; the only state shared with the
//! outside is the atomic running flag behind [`StopHandle`].

use crate::event::{Event, EventKind};
use crate::report::EventSink;
use crate::snapshot::{Snapshot, SnapshotError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Polling change-detection engine
///
/// `files` maps each tracked path to its baseline, the last-known
/// modification timestamp. `dirs` maps each watched directory to the
/// creation time captured at registration; directory entries drive child
/// discovery only and are never diffed themselves.
pub struct Engine<S: EventSink> {
    files: HashMap<PathBuf, SystemTime>,
    dirs: HashMap<PathBuf, SystemTime>,
    sink: S,
    interval: Duration,
    running: Arc<AtomicBool>,
}

/// Cloneable handle that stops a running engine from another thread
///
/// Takes effect at the next loop boundary; a poll pass in flight always
/// completes.
#[derive(Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl<S: EventSink> Engine<S> {
    /// Create an idle engine that sleeps `interval` between poll passes
    pub fn new(sink: S, interval: Duration) -> Self {
        Self {
            files: HashMap::new(),
            dirs: HashMap::new(),
            sink,
            interval,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Register files or directories to be watched
    ///
    /// Nonexistent paths produce a `NotFound` event and no table entry.
    /// Directories are expanded one level: every direct child present right
    /// now is tracked alongside the directory itself. Re-registering a
    /// tracked path is a no-op; its baseline is never reset.
    pub fn register<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.register_path(path.as_ref());
        }
    }

    fn register_path(&mut self, path: &Path) {
        if path.is_file() {
            self.add_file(path);
        } else if path.is_dir() {
            match Snapshot::capture(path) {
                Ok(snap) => {
                    self.dirs.entry(path.to_path_buf()).or_insert(snap.created);
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping directory registration");
                    return;
                }
            }
            for child in direct_children(path) {
                self.add_file(&child);
            }
        } else if !path.exists() {
            self.sink
                .report(&Event::now(path.to_path_buf(), EventKind::NotFound));
        } else {
            // Sockets, fifos and friends are not watchable
            debug!(path = %path.display(), "ignoring special file");
        }
    }

    /// Track a single path, baselined at its current creation timestamp
    ///
    /// Duplicate adds are no-ops so that re-registration (or rediscovery
    /// through a watched directory) cannot reset an existing baseline.
    fn add_file(&mut self, path: &Path) -> Option<SystemTime> {
        if self.files.contains_key(path) {
            return None;
        }
        match Snapshot::capture(path) {
            Ok(snap) => {
                self.files.insert(path.to_path_buf(), snap.created);
                Some(snap.created)
            }
            Err(SnapshotError::NotFound(_)) => {
                // Raced with an unlink between discovery and stat
                self.sink
                    .report(&Event::now(path.to_path_buf(), EventKind::NotFound));
                None
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "cannot baseline path");
                None
            }
        }
    }

    /// One full diff pass over everything tracked
    ///
    /// Files first: vanished entries emit `Deleted` and leave the table,
    /// advanced mtimes emit `Modified` and move the baseline. Directories
    /// second: newly appeared direct children are adopted and emit
    /// `Created`. Any single-path failure is contained to that path.
    pub fn poll(&mut self) {
        // Snapshot the key set up front; removals below must not disturb
        // the iteration.
        let tracked: Vec<PathBuf> = self.files.keys().cloned().collect();

        for path in tracked {
            match Snapshot::capture(&path) {
                Ok(snap) => {
                    if let Some(baseline) = self.files.get_mut(&path) {
                        if snap.modified > *baseline {
                            *baseline = snap.modified;
                            self.sink
                                .report(&Event::new(path, EventKind::Modified, snap.modified));
                        }
                    }
                }
                Err(SnapshotError::NotFound(_)) => {
                    self.files.remove(&path);
                    self.sink.report(&Event::now(path, EventKind::Deleted));
                }
                Err(err) => {
                    // Transient stat failure; the next pass re-evaluates
                    warn!(path = %path.display(), %err, "skipping entry this pass");
                }
            }
        }

        // A directory that disappears is never reported deleted; its entry
        // stays and only the enumeration warning below shows up.
        let watched_dirs: Vec<PathBuf> = self.dirs.keys().cloned().collect();

        for dir in watched_dirs {
            for child in direct_children(&dir) {
                if self.files.contains_key(&child) {
                    continue;
                }
                if let Some(created) = self.add_file(&child) {
                    self.sink
                        .report(&Event::new(child, EventKind::Created, created));
                }
            }
        }
    }

    /// Poll repeatedly until stopped
    ///
    /// Blocks the calling thread for the engine's running lifetime; use
    /// [`Engine::stop_handle`] to end the loop from elsewhere. `stop`
    /// followed by another `run` is a legal restart.
    pub fn run(&mut self) {
        info!(
            files = self.files.len(),
            dirs = self.dirs.len(),
            interval_ms = self.interval.as_millis() as u64,
            "watching"
        );
        self.running.store(true, Ordering::SeqCst);
        while self.running.load(Ordering::SeqCst) {
            self.poll();
            thread::sleep(self.interval);
        }
        info!("watch loop stopped");
    }

    /// Signal the run loop to exit at its next boundary
    ///
    /// With `clear`, also drop every tracked entry so the engine is ready
    /// for fresh registration.
    pub fn stop(&mut self, clear: bool) {
        self.running.store(false, Ordering::SeqCst);
        if clear {
            self.files.clear();
            self.dirs.clear();
        }
    }

    /// Handle for stopping the loop from another thread
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Number of tracked files
    pub fn tracked_files(&self) -> usize {
        self.files.len()
    }

    /// Number of watched directories
    pub fn tracked_dirs(&self) -> usize {
        self.dirs.len()
    }

    /// Whether `path` is currently tracked as a file
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Stored baseline for a tracked file
    pub fn baseline(&self, path: &Path) -> Option<SystemTime> {
        self.files.get(path).copied()
    }
}

/// Direct children of `dir`, one level deep
///
/// Unreadable entries are logged and skipped, including the case where the
/// directory itself has vanished.
fn direct_children(dir: &Path) -> Vec<PathBuf> {
    let mut children = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        match entry {
            Ok(entry) => children.push(entry.into_path()),
            Err(err) => {
                warn!(dir = %dir.display(), %err, "cannot enumerate directory entry");
            }
        }
    }
    children
}
