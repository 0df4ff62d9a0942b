//! Service runtime setup.
//!
//! The service loop runs on its own tokio runtime in a dedicated thread,
//! keeping the host free to block on whatever foreground surface it has.

use std::sync::Arc;
use std::thread;

use queasy_store::Store;
use tokio::sync::mpsc::Receiver;

use crate::platform::Platform;
use crate::service::{ControlMessage, run_service};

/// Spawns the overlay service. The loop runs until a
/// [`ControlMessage::Shutdown`] arrives or every sender is dropped; join
/// the returned handle to wait for an orderly stop.
pub fn run(
    store: Arc<Store>,
    platform: Platform,
    rx: Receiver<ControlMessage>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to build tokio runtime");
        runtime.block_on(run_service(store, platform, rx));
    })
}
