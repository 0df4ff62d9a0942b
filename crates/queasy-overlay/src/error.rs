use queasy_data::DrawingMode;
use queasy_store::StoreError;

/// Errors surfaced by overlay lifecycle transitions. None of these crash
/// the service: the loop logs them and remains in its last good state.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// The permission required by the current drawing mode is not granted.
    /// The controller stays stopped and writes no timestamp.
    #[error("required overlay permission is not granted")]
    PermissionDenied,
    /// The OS refused to present the overlay surface. The transition is
    /// aborted and the controller remains in its prior state.
    #[error("overlay surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// The record selects a drawing mode this controller does not present
    /// (the foreground surface only serves draw-over-other-apps).
    #[error("drawing mode `{0}` is not presented by the foreground overlay")]
    UnsupportedMode(DrawingMode),
    /// A store commit failed while recording a transition.
    #[error(transparent)]
    Store(#[from] StoreError),
}
