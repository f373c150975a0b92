//! Point-in-time metadata reads
//!
//! Every capture goes straight to the filesystem; nothing here caches. The
//! poll loop calls this at high frequency, so the only state is what `stat`
//! returns.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Metadata snapshot of a single path
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    /// Creation time: `st_ctime` on Unix, true birth time elsewhere,
    /// falling back to mtime where the platform reports neither
    pub created: SystemTime,
    /// Last modification time
    pub modified: SystemTime,
    /// Last access time, falling back to mtime where unsupported
    pub accessed: SystemTime,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to stat {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Snapshot {
    /// Read the current timestamps for `path`
    ///
    /// Fails with [`SnapshotError::NotFound`] if the path no longer exists.
    /// `created` and `accessed` degrade to the modification time rather
    /// than failing the whole capture on platforms that track neither.
    pub fn capture(path: &Path) -> Result<Self, SnapshotError> {
        let meta = fs::metadata(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                SnapshotError::NotFound(path.to_path_buf())
            } else {
                SnapshotError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let modified = meta.modified().map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            created: creation_time(&meta, modified),
            modified,
            accessed: meta.accessed().unwrap_or(modified),
        })
    }
}

/// `st_ctime` with nanosecond precision
///
/// Unix has no portable birth time; the change time is what `stat` has
/// always exposed as the "c" timestamp, and it moves in lockstep with
/// mtime on ordinary writes.
#[cfg(unix)]
fn creation_time(meta: &fs::Metadata, fallback: SystemTime) -> SystemTime {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let secs = meta.ctime();
    if secs >= 0 {
        UNIX_EPOCH + Duration::new(secs as u64, meta.ctime_nsec() as u32)
    } else {
        fallback
    }
}

#[cfg(not(unix))]
fn creation_time(meta: &fs::Metadata, fallback: SystemTime) -> SystemTime {
    meta.created().unwrap_or(fallback)
}
