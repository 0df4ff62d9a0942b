//! Durable application-state store shared by independent OS processes.
//!
//! The store keeps a single [`queasy_data::AppState`] record in one TOML
//! file and brokers all access to it:
//!
//! - [`Store::update`] is a serializable read-modify-write: commits take an
//!   advisory file lock shared across processes, re-read the latest record
//!   from disk, apply the caller's closure, and replace the file atomically
//!   (write-new-then-rename). Concurrent updates from any number of
//!   processes cannot lose writes.
//! - [`Store::subscribe`] exposes the record as a push-updated stream of
//!   snapshots. Local commits publish directly; remote commits arrive
//!   through a filesystem watcher on the backing file, so every cooperating
//!   process observes a commit without polling.
//!
//! Missing, unreadable, or corrupt files are never fatal: they read as the
//! default (all-unset) record and the store keeps serving.

mod lock;
mod record;
mod watcher;

pub mod error;
pub mod paths;
pub mod store;

pub use error::StoreError;
pub use store::{Store, Subscription};
