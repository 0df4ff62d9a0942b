//! Delivery of commits made by other processes.
//!
//! Commits replace the record file via rename, so a filesystem watcher on
//! the store directory sees every one of them. On a relevant event the
//! record is re-read and published into the local subscription channel;
//! unchanged values are suppressed there, so redundant events (including
//! echoes of this process's own commits) cost one read and no delivery.

use std::path::{Path, PathBuf};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use queasy_data::AppState;
use tokio::sync::watch;

use crate::record;

/// Watches the store directory and republishes the record on every change
/// to the data file. The returned watcher must be kept alive for delivery
/// to continue.
pub(crate) fn spawn(
    dir: &Path,
    data_path: PathBuf,
    tx: watch::Sender<AppState>,
) -> notify::Result<RecommendedWatcher> {
    let data_file_name = data_path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        let event = match result {
            Ok(event) => event,
            Err(err) => {
                log::warn!("Store watcher error: {err}");
                return;
            }
        };
        if event.kind.is_access() {
            return;
        }
        // Lock-file and temp-file traffic also lands in this directory;
        // only the record file itself is interesting.
        let touches_record = event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(data_file_name.as_os_str()));
        if !touches_record {
            return;
        }

        let state = record::read(&data_path);
        crate::store::publish_latest(&tx, state);
    })?;

    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
