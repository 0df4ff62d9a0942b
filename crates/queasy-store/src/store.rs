use std::path::PathBuf;

use notify::RecommendedWatcher;
use queasy_data::{AppState, SCHEMA_VERSION};
use tokio::sync::watch;

use crate::error::StoreError;
use crate::lock::CommitLock;
use crate::{paths, record, watcher};

/// Handle to the durable application-state record.
///
/// All cooperating processes open the same store directory; any number of
/// `Store` instances (across processes or within one) may read, subscribe,
/// and update concurrently. Cheap to share behind an `Arc`.
pub struct Store {
    data_path: PathBuf,
    lock_path: PathBuf,
    tx: watch::Sender<AppState>,
    // Keeps cross-process change delivery alive for this store's lifetime.
    _watcher: RecommendedWatcher,
}

impl Store {
    /// Opens the store in the per-user data directory.
    pub fn open_default() -> Result<Store, StoreError> {
        Store::open_at(paths::store_dir()?)
    }

    /// Opens the store in `dir`, creating it if needed. Tests point this at
    /// a temp directory; production callers use [`Store::open_default`].
    pub fn open_at(dir: impl Into<PathBuf>) -> Result<Store, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let data_path = dir.join(paths::DATA_FILE_NAME);
        let lock_path = dir.join(paths::LOCK_FILE_NAME);

        let initial = record::read(&data_path);
        let (tx, _) = watch::channel(initial);
        let watcher = watcher::spawn(&dir, data_path.clone(), tx.clone())?;
        log::info!("Opened state store at {data_path:?}");

        Ok(Store {
            data_path,
            lock_path,
            tx,
            _watcher: watcher,
        })
    }

    /// Returns the latest committed record this process has observed.
    pub fn read(&self) -> AppState {
        self.tx.borrow().clone()
    }

    /// Applies `f` to the latest committed record and commits the result
    /// atomically, returning the committed value.
    ///
    /// Commits are serializable across all processes of the installation:
    /// the closure runs under the cross-process commit lock against a fresh
    /// read of the file, so concurrent updates can never lose writes. The
    /// committed record is clamped to its documented ranges and stamped
    /// with the schema version.
    ///
    /// Blocks on lock acquisition (bounded retry schedule); never call it
    /// from a latency-critical rendering path.
    pub async fn update<F>(&self, f: F) -> Result<AppState, StoreError>
    where
        F: FnOnce(AppState) -> AppState + Send + 'static,
    {
        let data_path = self.data_path.clone();
        let lock_path = self.lock_path.clone();

        let committed = tokio::task::spawn_blocking(move || {
            let _guard = CommitLock::acquire(&lock_path)?;
            let current = record::read(&data_path);
            let seq = current.commit_seq();
            let mut next = f(current).clamped();
            next.schema_version = Some(SCHEMA_VERSION);
            // The counter is store bookkeeping: stamped under the lock so
            // it is strictly monotonic across processes, and survives even
            // a closure (like reset) that hands back a fresh record.
            next.commit_seq = Some(seq + 1);
            record::write_atomic(&data_path, &next)?;
            Ok::<AppState, StoreError>(next)
        })
        .await
        .expect("store commit task panicked")?;

        publish_latest(&self.tx, committed.clone());
        Ok(committed)
    }

    /// Replaces the record with the default (all-unset) record.
    pub async fn reset(&self) -> Result<AppState, StoreError> {
        log::info!("Resetting state store to defaults");
        self.update(|_| AppState::default()).await
    }

    /// Subscribes to the record. The first yielded snapshot is the current
    /// value; each later one corresponds to a commit observed by this
    /// process, local or cross-process. Every subscription independently
    /// receives the full sequence; dropping it releases its resources.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            primed: false,
        }
    }

}

/// Publishes a snapshot into a subscription channel unless it is stale.
///
/// A commit made here races the filesystem watcher: another process can
/// commit a newer record and have the watcher deliver it before this
/// process's own `update` call gets to publish. Comparing the commit
/// counter keeps the late publish of the older value from winning;
/// unchanged values are suppressed as before.
pub(crate) fn publish_latest(tx: &watch::Sender<AppState>, state: AppState) {
    tx.send_if_modified(|current| {
        if state.commit_seq() < current.commit_seq() || *current == state {
            false
        } else {
            *current = state;
            true
        }
    });
}

/// A push-updated stream of record snapshots, see [`Store::subscribe`].
///
/// Delivery is at-least-once per change: intermediate snapshots may be
/// skipped when commits outpace the subscriber, but the latest committed
/// value is always delivered, and unchanged values are not re-delivered.
pub struct Subscription {
    rx: watch::Receiver<AppState>,
    primed: bool,
}

impl Subscription {
    /// Waits for the next snapshot. Returns `None` once the originating
    /// store has been dropped.
    pub async fn next(&mut self) -> Option<AppState> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    const VISIBILITY_BOUND: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn read_before_first_commit_serves_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(dir.path()).unwrap();
        assert_eq!(store.read(), AppState::default());
    }

    #[tokio::test]
    async fn update_commits_and_is_visible_to_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(dir.path()).unwrap();

        let committed = store
            .update(|mut state| {
                state.onboarded = Some(true);
                state.set_overlay_speed(0.75);
                state
            })
            .await
            .unwrap();

        assert_eq!(committed.schema_version, Some(SCHEMA_VERSION));
        assert_eq!(store.read().onboarded, Some(true));
        assert_eq!(store.read().overlay_speed(), 0.75);
    }

    #[tokio::test]
    async fn commit_clamps_out_of_range_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(dir.path()).unwrap();

        let committed = store
            .update(|mut state| {
                state.overlay_area_size = Some(9.0);
                state
            })
            .await
            .unwrap();
        assert_eq!(committed.overlay_area_size, Some(1.0));
    }

    #[tokio::test]
    async fn reset_replaces_record_with_all_unset() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(dir.path()).unwrap();

        store
            .update(|mut state| {
                state.onboarded = Some(true);
                state.foreground_overlay_start_time = Some(123);
                state
            })
            .await
            .unwrap();

        let state = store.reset().await.unwrap();
        assert_eq!(state.onboarded, None);
        assert_eq!(state.foreground_overlay_start_time, None);
    }

    #[tokio::test]
    async fn concurrent_updates_lose_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::open_at(dir.path()).unwrap());

        const WRITERS: i64 = 16;
        let mut tasks = Vec::new();
        for _ in 0..WRITERS {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .update(|mut state| {
                        state.app_download_time = Some(state.app_download_time() + 1);
                        state
                    })
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.read().app_download_time(), WRITERS);
    }

    #[tokio::test]
    async fn subscription_yields_current_value_then_commits() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(dir.path()).unwrap();

        let mut sub = store.subscribe();
        assert_eq!(sub.next().await.unwrap(), AppState::default());

        store
            .update(|mut state| {
                state.review_prompted = Some(true);
                state
            })
            .await
            .unwrap();

        let snapshot = timeout(VISIBILITY_BOUND, sub.next())
            .await
            .expect("commit not delivered in time")
            .unwrap();
        assert_eq!(snapshot.review_prompted, Some(true));
    }

    #[tokio::test]
    async fn every_subscriber_receives_the_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(dir.path()).unwrap();

        let mut first = store.subscribe();
        let mut second = store.subscribe();
        first.next().await.unwrap();
        second.next().await.unwrap();

        store
            .update(|mut state| {
                state.onboarded = Some(true);
                state
            })
            .await
            .unwrap();

        for sub in [&mut first, &mut second] {
            let snapshot = timeout(VISIBILITY_BOUND, sub.next()).await.unwrap().unwrap();
            assert_eq!(snapshot.onboarded, Some(true));
        }
    }

    #[tokio::test]
    async fn commit_by_one_store_reaches_a_subscriber_of_another() {
        let dir = tempfile::tempdir().unwrap();
        let writer = Store::open_at(dir.path()).unwrap();
        let reader = Store::open_at(dir.path()).unwrap();

        let mut sub = reader.subscribe();
        assert_eq!(sub.next().await.unwrap(), AppState::default());

        writer
            .update(|mut state| {
                state.foreground_overlay_start_time = Some(4242);
                state
            })
            .await
            .unwrap();

        let snapshot = timeout(VISIBILITY_BOUND, sub.next())
            .await
            .expect("cross-instance commit not delivered in time")
            .unwrap();
        assert_eq!(snapshot.foreground_overlay_start_time, Some(4242));
    }

    #[tokio::test]
    async fn commits_carry_a_monotonic_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(dir.path()).unwrap();

        let first = store.update(|state| state).await.unwrap();
        assert_eq!(first.commit_seq(), 1);
        let second = store.update(|state| state).await.unwrap();
        assert_eq!(second.commit_seq(), 2);

        // Even a closure that replaces the whole record cannot rewind the
        // counter; a rewind would make later commits look stale.
        let after_reset = store.reset().await.unwrap();
        assert_eq!(after_reset.commit_seq(), 3);
    }

    #[tokio::test]
    async fn late_delivery_of_an_older_commit_is_ignored() {
        let newer = AppState {
            commit_seq: Some(5),
            onboarded: Some(true),
            ..AppState::default()
        };
        let older = AppState {
            commit_seq: Some(4),
            ..AppState::default()
        };

        let (tx, rx) = watch::channel(newer.clone());
        publish_latest(&tx, older);
        assert_eq!(*rx.borrow(), newer);

        let even_newer = AppState {
            commit_seq: Some(6),
            ..AppState::default()
        };
        publish_latest(&tx, even_newer.clone());
        assert_eq!(*rx.borrow(), even_newer);
    }

    #[tokio::test]
    async fn reopening_the_store_sees_the_committed_record() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = Store::open_at(dir.path()).unwrap();
            store
                .update(|mut state| {
                    state.quick_settings_tile_added = Some(true);
                    state
                })
                .await
                .unwrap();
        }
        let reopened = Store::open_at(dir.path()).unwrap();
        assert_eq!(reopened.read().quick_settings_tile_added, Some(true));
    }
}
