//! Reading and committing the on-disk record.

use std::path::Path;

use queasy_data::AppState;

use crate::error::StoreError;

/// Reads the committed record, or the default record when the file is
/// missing, unreadable, or corrupt. Read failures are contained here: the
/// store keeps serving the defaults and the next commit rewrites the file.
pub(crate) fn read(path: &Path) -> AppState {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppState::default();
        }
        Err(err) => {
            log::error!("Store file {path:?} unreadable ({err}), serving defaults");
            return AppState::default();
        }
    };

    match toml::from_str(&contents) {
        Ok(state) => state,
        Err(err) => {
            log::warn!("Store file {path:?} corrupt ({err}), discarding and serving defaults");
            AppState::default()
        }
    }
}

/// Commits `state` by writing a sibling temp file and renaming it over the
/// target, so a failed write can never corrupt the previously committed
/// value. Callers must hold the commit lock.
pub(crate) fn write_atomic(path: &Path, state: &AppState) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(state)?;
    let file_name = path.file_name().and_then(|v| v.to_str()).unwrap_or("record");
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));
    {
        use std::io::Write;
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(contents.as_bytes())?;
        // Flush to disk before the rename makes the file the record;
        // otherwise a power loss could install an empty one.
        file.sync_all()?;
    }

    // Windows rename requires the target not to exist.
    #[cfg(windows)]
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
