//! Polling file system watcher for Vigil
//!
//! This crate provides change detection without OS-native notification
//! backends:
//! - Metadata snapshots read fresh from disk on every pass
//! - A diff engine tracking per-file modification baselines
//! - One-level directory expansion with self-healing child discovery
//! - Color-coded console reporting of every detected transition

pub mod engine;
pub mod event;
pub mod report;
pub mod snapshot;

pub use engine::{Engine, StopHandle};
pub use event::{Event, EventKind};
pub use report::{ConsoleReporter, EventSink};
pub use snapshot::{Snapshot, SnapshotError};
