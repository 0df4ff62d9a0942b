//! Overlay service lifecycle: the controller state machine and the
//! background service loop that drives it.
//!
//! The controller ([`controller::OverlayController`]) decides from store
//! state and permission status whether the overlay should be presented,
//! acquires and releases the on-screen surface through the
//! [`platform::OverlaySurface`] collaborator, and writes start/stop
//! timestamps back into the store so its liveness is externally observable
//! and crash-consistent.
//!
//! All transitions run on a single service loop ([`service::run_service`]),
//! so they are serialized by construction: concurrent start/stop requests
//! are coalesced, never interleaved.

pub mod controller;
pub mod error;
pub mod platform;
pub mod runtime;
pub mod service;

pub use controller::{OverlayController, OverlayPhase};
pub use error::OverlayError;
pub use platform::{OverlaySurface, PermissionKind, Permissions, Platform, SurfaceHandle, TileIndicator};
pub use service::ControlMessage;
