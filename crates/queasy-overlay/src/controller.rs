//! The overlay lifecycle state machine.

use std::sync::Arc;

use queasy_data::{AppState, DrawingMode, now_epoch_ms};
use queasy_store::Store;

use crate::error::OverlayError;
use crate::platform::{PermissionKind, Platform, SurfaceHandle};

/// Lifecycle phase of the overlay presentation.
///
/// Between controller calls only `Stopped` and `Active` are observable;
/// `Starting` and `Stopping` exist within a single serialized transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Stopped,
    Starting,
    Active,
    Stopping,
}

/// Drives the overlay on and off and keeps the store's liveness timestamps
/// in sync with reality.
///
/// Invariant maintained by every completed transition: the controller is
/// `Active` holding a surface iff the store's start time is greater than
/// its stop time. Callers must serialize transitions (the service loop
/// owns the controller exclusively); the methods themselves are not
/// reentrant.
pub struct OverlayController {
    store: Arc<Store>,
    platform: Platform,
    phase: OverlayPhase,
    held: Option<SurfaceHandle>,
}

impl OverlayController {
    pub fn new(store: Arc<Store>, platform: Platform) -> OverlayController {
        OverlayController {
            store,
            platform,
            phase: OverlayPhase::Stopped,
            held: None,
        }
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Brings the overlay up: permission check, surface acquisition, then
    /// exactly one start-timestamp write. A start while already active is
    /// a no-op; a failed acquisition leaves the controller stopped with no
    /// timestamp written.
    pub async fn start(&mut self) -> Result<(), OverlayError> {
        match self.phase {
            OverlayPhase::Active | OverlayPhase::Starting => {
                log::warn!("Overlay already active, ignoring start request");
                return Ok(());
            }
            OverlayPhase::Stopping => {
                log::warn!("Overlay is stopping, ignoring start request");
                return Ok(());
            }
            OverlayPhase::Stopped => {}
        }

        let mode = effective_mode(&self.store.read());
        if mode != DrawingMode::DrawOverOtherApps {
            // The accessibility service presents on its own; acquiring the
            // foreground surface here would be stopped again by the very
            // next snapshot evaluation.
            log::warn!("Overlay in mode {mode} is not presented by this controller");
            return Err(OverlayError::UnsupportedMode(mode));
        }
        if !self.permission_granted(mode) {
            log::warn!("Cannot start overlay in mode {mode}: permission not granted");
            self.platform
                .permissions
                .request_permission(required_permission(mode));
            return Err(OverlayError::PermissionDenied);
        }

        log::info!("Starting overlay (mode {mode})...");
        self.phase = OverlayPhase::Starting;
        let handle = match self.platform.surface.acquire() {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("Failed to acquire overlay surface: {err}");
                self.phase = OverlayPhase::Stopped;
                return Err(err);
            }
        };
        self.held = Some(handle);

        let now = now_epoch_ms();
        let write = self
            .store
            .update(move |mut state| {
                // Persist the defaulted mode along with the timestamp, or
                // the committed record would not satisfy its own
                // desired-state derivation and the next snapshot would
                // stop the overlay straight away.
                state.drawing_mode = Some(mode);
                state.foreground_overlay_start_time = Some(now);
                state
            })
            .await;
        if let Err(err) = write {
            // The surface is up; keep running and let the next commit or
            // the reconciliation pass repair the record.
            log::error!("Failed to record overlay start time: {err}");
        }

        self.phase = OverlayPhase::Active;
        self.platform.tile.overlay_state_changed(true);
        log::info!("Overlay active");
        Ok(())
    }

    /// Takes the overlay down: releases the surface, then exactly one
    /// stop-timestamp write. A stop while already stopped is a no-op.
    pub async fn stop(&mut self) {
        match self.phase {
            OverlayPhase::Stopped | OverlayPhase::Stopping => {
                log::debug!("Overlay not active, nothing to stop");
                return;
            }
            OverlayPhase::Starting | OverlayPhase::Active => {}
        }

        log::info!("Stopping overlay...");
        self.phase = OverlayPhase::Stopping;
        if let Some(handle) = self.held.take() {
            self.platform.surface.release(handle);
        }

        let now = now_epoch_ms();
        let write = self
            .store
            .update(move |mut state| {
                state.foreground_overlay_stop_time = Some(now);
                state
            })
            .await;
        if let Err(err) = write {
            log::error!("Failed to record overlay stop time: {err}");
        }

        self.phase = OverlayPhase::Stopped;
        self.platform.tile.overlay_state_changed(false);
        log::info!("Overlay stopped");
    }

    /// Re-evaluates the desired state against a store snapshot and, when
    /// they disagree, performs the one transition that closes the gap.
    /// Permission loss while active forces a stop regardless of the
    /// desired state.
    pub async fn apply_snapshot(&mut self, snapshot: &AppState) {
        let mode = snapshot.drawing_mode();
        let desired = mode == DrawingMode::DrawOverOtherApps && snapshot.overlay_active();
        let permitted = self.permission_granted(mode);

        match self.phase {
            OverlayPhase::Stopped if desired => {
                // An unhonored start must not leave the record claiming
                // liveness: correct it so the store never lies about a
                // period when nothing is on screen.
                if !permitted {
                    log::warn!(
                        "Overlay requested but permission is not granted; correcting record"
                    );
                    self.correct_stop_record().await;
                } else if let Err(err) = self.start().await {
                    log::error!("Failed to start overlay from store state: {err}");
                    self.correct_stop_record().await;
                }
            }
            OverlayPhase::Active if !desired || !permitted => {
                if !permitted {
                    log::warn!("Overlay permission revoked while active, stopping");
                }
                self.stop().await;
            }
            _ => {}
        }
    }

    /// Crash recovery, run once at service startup before any other
    /// transition: a record claiming the overlay is active while no
    /// surface is held means a previous service died mid-flight. Policy is
    /// correct-and-stop: the stop timestamp is rewritten to reflect
    /// reality, after which normal desired-state evaluation takes over.
    pub async fn reconcile(&mut self) {
        let state = self.store.read();
        if !state.overlay_active() || self.held.is_some() {
            return;
        }

        log::warn!("Store claims an active overlay but no surface is held; correcting stop time");
        self.correct_stop_record().await;
    }

    /// Rewrites the stop timestamp so the record no longer claims an
    /// overlay that is not on screen, and tells the tile so.
    async fn correct_stop_record(&mut self) {
        let write = self
            .store
            .update(|mut state| {
                let stop = now_epoch_ms().max(state.foreground_overlay_start_time());
                state.foreground_overlay_stop_time = Some(stop);
                state
            })
            .await;
        match write {
            Ok(_) => self.platform.tile.overlay_state_changed(false),
            Err(err) => log::error!("Failed to correct overlay stop time: {err}"),
        }
    }

    fn permission_granted(&self, mode: DrawingMode) -> bool {
        match required_permission(mode) {
            PermissionKind::Overlay => self.platform.permissions.has_overlay_permission(),
            PermissionKind::Accessibility => {
                self.platform.permissions.has_accessibility_permission()
            }
        }
    }
}

fn required_permission(mode: DrawingMode) -> PermissionKind {
    match mode {
        DrawingMode::AccessibilityService => PermissionKind::Accessibility,
        DrawingMode::None | DrawingMode::DrawOverOtherApps => PermissionKind::Overlay,
    }
}

/// A start request with no mode chosen yet selects draw-over-other-apps,
/// mirroring the app's default-mode behavior.
fn effective_mode(state: &AppState) -> DrawingMode {
    match state.drawing_mode() {
        DrawingMode::None => DrawingMode::DrawOverOtherApps,
        mode => mode,
    }
}
