//! Cross-process mutual exclusion for commits.
//!
//! An advisory exclusive lock on a dedicated lock file guards the commit
//! critical section across all cooperating processes. Advisory locks are
//! released by the OS when the holding process dies, so a crashed writer
//! cannot deadlock later acquirers.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::time::Duration;

use fs2::FileExt;

use crate::error::StoreError;

const MAX_ATTEMPTS: u32 = 20;
const INITIAL_BACKOFF: Duration = Duration::from_millis(5);
const MAX_BACKOFF: Duration = Duration::from_millis(100);

/// Held commit lock; unlocks on drop. Acquisition blocks the calling
/// thread, so take it from a blocking context only.
pub(crate) struct CommitLock {
    file: File,
}

impl CommitLock {
    /// Acquires the lock, retrying with backoff while another process
    /// holds it. Fails with [`StoreError::LockUnavailable`] only after the
    /// whole retry schedule is exhausted.
    pub(crate) fn acquire(path: &Path) -> Result<CommitLock, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let mut backoff = INITIAL_BACKOFF;
        for attempt in 1..=MAX_ATTEMPTS {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(CommitLock { file }),
                Err(err) if err.kind() == fs2::lock_contended_error().kind() => {
                    log::debug!("Commit lock contended (attempt {attempt}/{MAX_ATTEMPTS})");
                    std::thread::sleep(backoff);
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                Err(err) => return Err(StoreError::IoError(err)),
            }
        }
        Err(StoreError::LockUnavailable {
            attempts: MAX_ATTEMPTS,
        })
    }
}

impl Drop for CommitLock {
    fn drop(&mut self) {
        if let Err(err) = self.file.unlock() {
            log::warn!("Failed to release commit lock: {err}");
        }
    }
}
