//! Change events produced by the poll loop

use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

/// Kind of change observed on a watched path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A new entry appeared in a watched directory
    Created,
    /// A tracked file's modification time advanced
    Modified,
    /// A tracked file is gone from disk
    Deleted,
    /// A tracked file was read (reserved, never emitted by the engine)
    Accessed,
    /// A registered path did not exist at registration time
    NotFound,
}

impl EventKind {
    /// Display text used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Modified => "modified",
            EventKind::Deleted => "deleted",
            EventKind::Accessed => "accessed",
            EventKind::NotFound => "not found",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One observed change: which path, what happened, and when
///
/// Events are ephemeral: the engine hands each one to its sink the moment
/// the diff pass produces it, and nothing retains them afterwards.
#[derive(Debug, Clone)]
pub struct Event {
    /// Path that changed
    pub path: PathBuf,
    /// Type of change
    pub kind: EventKind,
    /// When the change was observed (or occurred, for mtime-carried events)
    pub timestamp: DateTime<Local>,
}

impl Event {
    /// Build an event, converting the filesystem timestamp to local time
    pub fn new(path: PathBuf, kind: EventKind, timestamp: SystemTime) -> Self {
        Self {
            path,
            kind,
            timestamp: timestamp.into(),
        }
    }

    /// Event stamped with the current wall-clock time
    pub fn now(path: PathBuf, kind: EventKind) -> Self {
        Self::new(path, kind, SystemTime::now())
    }

    /// Timestamp rendered as `Wed 03/Jan/2024 - 14:30:00.123456`
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%a %d/%b/%Y - %H:%M:%S%.6f").to_string()
    }
}
