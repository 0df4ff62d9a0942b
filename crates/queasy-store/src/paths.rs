use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::StoreError;

/// File name of the persisted record inside the store directory.
pub const DATA_FILE_NAME: &str = "app_data.toml";
/// File name of the cross-process commit lock inside the store directory.
pub const LOCK_FILE_NAME: &str = "app_data.lock";

/// Resolves the per-user directory holding the record and its lock file.
/// All cooperating processes of the installation must resolve the same
/// directory.
pub fn store_dir() -> Result<PathBuf, StoreError> {
    match ProjectDirs::from("com", "leanrada", "queasy") {
        Some(dirs) => Ok(dirs.data_dir().to_path_buf()),
        None => Err(StoreError::DirectoriesNotFound),
    }
}
