//! Collaborator seams between the lifecycle controller and the host OS.
//!
//! The controller never talks to the windowing system directly; it goes
//! through these traits so the service can run headless in tests and so
//! platform backends stay out of the lifecycle logic.

use std::sync::Arc;

use crate::error::OverlayError;

/// Which OS permission a drawing mode needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    /// Permission to draw a window over other apps.
    Overlay,
    /// Permission to present through the accessibility service.
    Accessibility,
}

/// Opaque handle to an acquired overlay surface. Returned by
/// [`OverlaySurface::acquire`] and passed back on release; the controller
/// holds at most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceHandle(pub u64);

/// Permission checks and the OS grant flow.
pub trait Permissions: Send + Sync {
    fn has_overlay_permission(&self) -> bool;
    fn has_accessibility_permission(&self) -> bool;
    /// Triggers the OS flow asking the user to grant `kind`. Returns
    /// immediately; the grant lands asynchronously and is observed by the
    /// next permission check.
    fn request_permission(&self, kind: PermissionKind);
}

/// The on-screen presentation resource.
pub trait OverlaySurface: Send + Sync {
    fn acquire(&self) -> Result<SurfaceHandle, OverlayError>;
    fn release(&self, handle: SurfaceHandle);
}

/// Quick-settings tile / status indicator, told about every transition
/// between active and stopped.
pub trait TileIndicator: Send + Sync {
    fn overlay_state_changed(&self, active: bool);
}

/// Bundle of the platform collaborators handed to the service.
#[derive(Clone)]
pub struct Platform {
    pub permissions: Arc<dyn Permissions>,
    pub surface: Arc<dyn OverlaySurface>,
    pub tile: Arc<dyn TileIndicator>,
}
