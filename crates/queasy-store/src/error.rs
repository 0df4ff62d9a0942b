/// Errors that can occur while opening the store or committing a record.
///
/// Read-side failures (missing file, unreadable file, corrupt record) are
/// contained inside the store and degrade to the default record; they never
/// appear here.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to determine the user's data directory. This usually occurs
    /// when required environment variables are missing (e.g., `$HOME` on
    /// Unix or `%APPDATA%` on Windows).
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    /// An I/O error occurred while preparing or committing the record file.
    #[error("failed to access store file: {0}")]
    IoError(#[from] std::io::Error),
    /// Failed to serialize the record to TOML.
    #[error("failed to serialize record: {0}")]
    SerializeError(#[from] toml::ser::Error),
    /// The cross-process commit lock stayed contended through the whole
    /// retry schedule.
    #[error("commit lock still held after {attempts} attempts")]
    LockUnavailable { attempts: u32 },
    /// Failed to install the filesystem watcher that delivers remote
    /// commits.
    #[error("failed to watch store file: {0}")]
    WatchError(#[from] notify::Error),
}
