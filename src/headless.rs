//! Default platform wiring for hosts without a native overlay backend.
//!
//! The real presentation layer (the window drawing the moving pattern) is
//! a separate concern plugged in through the `queasy_overlay::platform`
//! traits. Until a native backend is wired up, the service runs with these
//! headless collaborators: permissions always granted, a surface that only
//! tracks its handle, and a tile indicator that logs transitions.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use queasy_overlay::{
    OverlayError, OverlaySurface, PermissionKind, Permissions, Platform, SurfaceHandle,
    TileIndicator,
};

struct HeadlessPermissions;

impl Permissions for HeadlessPermissions {
    fn has_overlay_permission(&self) -> bool {
        true
    }

    fn has_accessibility_permission(&self) -> bool {
        true
    }

    fn request_permission(&self, kind: PermissionKind) {
        log::info!("Permission {kind:?} requested (headless platform grants everything)");
    }
}

struct HeadlessSurface {
    next_handle: AtomicU64,
}

impl OverlaySurface for HeadlessSurface {
    fn acquire(&self) -> Result<SurfaceHandle, OverlayError> {
        let handle = SurfaceHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        log::info!("Acquired headless overlay surface {handle:?}");
        Ok(handle)
    }

    fn release(&self, handle: SurfaceHandle) {
        log::info!("Released headless overlay surface {handle:?}");
    }
}

struct LogTile;

impl TileIndicator for LogTile {
    fn overlay_state_changed(&self, active: bool) {
        log::info!(
            "Overlay indicator: {}",
            if active { "active" } else { "stopped" }
        );
    }
}

pub fn platform() -> Platform {
    Platform {
        permissions: Arc::new(HeadlessPermissions),
        surface: Arc::new(HeadlessSurface {
            next_handle: AtomicU64::new(1),
        }),
        tile: Arc::new(LogTile),
    }
}
