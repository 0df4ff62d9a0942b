//! The background service loop.
//!
//! One loop per service process owns the [`OverlayController`] and is the
//! only place transitions run, so they are serialized by construction. The
//! loop reacts to three inputs: in-process control messages, store
//! snapshots (which carry cross-process toggles), and a periodic tick that
//! re-checks permissions, since revocations arrive without any store
//! commit.

use std::sync::Arc;
use std::time::Duration;

use queasy_data::now_epoch_ms;
use queasy_store::Store;
use tokio::sync::mpsc::Receiver;

use crate::controller::OverlayController;
use crate::platform::Platform;

/// In-process commands for the service loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Bring the overlay up if permissions allow.
    StartOverlay,
    /// Take the overlay down.
    StopOverlay,
    /// Stop the overlay if needed and exit the loop.
    Shutdown,
}

const PERMISSION_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Runs the service until shutdown: crash reconciliation first, then the
/// dispatch loop. Always releases the surface before returning.
pub async fn run_service(store: Arc<Store>, platform: Platform, mut rx: Receiver<ControlMessage>) {
    ensure_download_time(&store).await;

    let mut controller = OverlayController::new(store.clone(), platform);
    controller.reconcile().await;

    let mut subscription = store.subscribe();
    let mut permission_poll = tokio::time::interval(PERMISSION_POLL_INTERVAL);
    permission_poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    log::info!("Overlay service loop running");
    loop {
        tokio::select! {
            message = rx.recv() => {
                let Some(message) = message else { break };
                match coalesce(message, &mut rx) {
                    ControlMessage::StartOverlay => {
                        if let Err(err) = controller.start().await {
                            log::error!("Start request failed: {err}");
                        }
                    }
                    ControlMessage::StopOverlay => controller.stop().await,
                    ControlMessage::Shutdown => break,
                }
            }
            snapshot = subscription.next() => {
                let Some(snapshot) = snapshot else { break };
                controller.apply_snapshot(&snapshot).await;
            }
            _ = permission_poll.tick() => {
                let snapshot = store.read();
                controller.apply_snapshot(&snapshot).await;
            }
        }
    }

    controller.stop().await;
    log::info!("Overlay service loop stopped");
}

/// Collapses a burst of queued control messages into the one that should
/// take effect. The last request wins, so a start that is still pending
/// when a stop arrives is superseded before it acquires anything; a queued
/// shutdown wins outright.
fn coalesce(first: ControlMessage, rx: &mut Receiver<ControlMessage>) -> ControlMessage {
    let mut latest = first;
    while let Ok(next) = rx.try_recv() {
        if next == ControlMessage::Shutdown {
            return ControlMessage::Shutdown;
        }
        if next != latest {
            log::debug!("Control request {latest:?} superseded by {next:?}");
        }
        latest = next;
    }
    latest
}

/// Records the first-launch time once, used by the review-prompt
/// collaborator outside this subsystem.
async fn ensure_download_time(store: &Arc<Store>) {
    if store.read().app_download_time() != 0 {
        return;
    }
    let now = now_epoch_ms();
    let write = store
        .update(move |mut state| {
            if state.app_download_time() == 0 {
                state.app_download_time = Some(now);
            }
            state
        })
        .await;
    if let Err(err) = write {
        log::error!("Failed to record app download time: {err}");
    }
}
