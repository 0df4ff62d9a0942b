use serde::{Deserialize, Serialize};

use crate::modes::{DrawingMode, OverlayColorScheme};

/// Defaults substituted by the typed accessors when a field is unset.
pub mod defaults {
    use crate::modes::{DrawingMode, OverlayColorScheme};

    pub const ONBOARDED: bool = false;
    pub const ONBOARDED_ACCESSIBILITY_SETTINGS: bool = false;
    pub const QUICK_SETTINGS_TILE_ADDED: bool = false;
    pub const DRAWING_MODE: DrawingMode = DrawingMode::None;
    pub const OVERLAY_COLOR_SCHEME: OverlayColorScheme = OverlayColorScheme::BlackAndWhite;
    pub const OVERLAY_AREA_SIZE: f32 = 0.5;
    pub const OVERLAY_SPEED: f32 = 0.5;
    pub const FOREGROUND_OVERLAY_START_TIME: i64 = 0;
    pub const FOREGROUND_OVERLAY_STOP_TIME: i64 = 0;
    pub const APP_DOWNLOAD_TIME: i64 = 0;
    pub const LAST_REVIEW_PROMPT_TIME: i64 = 0;
    pub const REVIEW_PROMPTED: bool = false;
    pub const APP_BACKGROUND_COLOR: u32 = 0xFFFF_FFFF;
    pub const BUTTON_BACKGROUND_COLOR: u32 = 0xFF00_0000;
    pub const PLAY_BUTTON_COLOR: u32 = 0xFF00_0000;
}

/// The durable application state, one record per installation.
///
/// Every field is optional in the persisted form: an absent field means
/// "never written", which is distinct from its zero value. Read access goes
/// through the typed accessors, which substitute the [`defaults`] for unset
/// fields. The whole record is always replaced atomically per commit; no
/// field is ever deleted on its own.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppState {
    /// Stamped by the store on every commit, see [`crate::SCHEMA_VERSION`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    /// Monotonic commit counter, maintained by the store under the commit
    /// lock. Orders snapshot delivery so a late publish of an older commit
    /// cannot overwrite a newer one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_seq: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarded_accessibility_settings: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_settings_tile_added: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawing_mode: Option<DrawingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_color_scheme: Option<OverlayColorScheme>,
    /// Fraction of the screen covered by the pattern, in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_area_size: Option<f32>,
    /// Pattern scroll speed, normalized to `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_speed: Option<f32>,

    /// Epoch milliseconds of the last successful overlay start. Together
    /// with the stop time this encodes liveness: the overlay is active iff
    /// the start time is strictly greater than the stop time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_overlay_start_time: Option<i64>,
    /// Epoch milliseconds of the last overlay stop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_overlay_stop_time: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_download_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_prompt_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_prompted: Option<bool>,

    /// 32-bit ARGB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_background_color: Option<u32>,
    /// 32-bit ARGB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_background_color: Option<u32>,
    /// 32-bit ARGB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_button_color: Option<u32>,
}

impl AppState {
    pub fn commit_seq(&self) -> u64 {
        self.commit_seq.unwrap_or(0)
    }

    pub fn onboarded(&self) -> bool {
        self.onboarded.unwrap_or(defaults::ONBOARDED)
    }

    pub fn onboarded_accessibility_settings(&self) -> bool {
        self.onboarded_accessibility_settings
            .unwrap_or(defaults::ONBOARDED_ACCESSIBILITY_SETTINGS)
    }

    pub fn quick_settings_tile_added(&self) -> bool {
        self.quick_settings_tile_added
            .unwrap_or(defaults::QUICK_SETTINGS_TILE_ADDED)
    }

    pub fn drawing_mode(&self) -> DrawingMode {
        self.drawing_mode.unwrap_or(defaults::DRAWING_MODE)
    }

    pub fn overlay_color_scheme(&self) -> OverlayColorScheme {
        self.overlay_color_scheme
            .unwrap_or(defaults::OVERLAY_COLOR_SCHEME)
    }

    pub fn overlay_area_size(&self) -> f32 {
        self.overlay_area_size.unwrap_or(defaults::OVERLAY_AREA_SIZE)
    }

    pub fn overlay_speed(&self) -> f32 {
        self.overlay_speed.unwrap_or(defaults::OVERLAY_SPEED)
    }

    pub fn foreground_overlay_start_time(&self) -> i64 {
        self.foreground_overlay_start_time
            .unwrap_or(defaults::FOREGROUND_OVERLAY_START_TIME)
    }

    pub fn foreground_overlay_stop_time(&self) -> i64 {
        self.foreground_overlay_stop_time
            .unwrap_or(defaults::FOREGROUND_OVERLAY_STOP_TIME)
    }

    pub fn app_download_time(&self) -> i64 {
        self.app_download_time.unwrap_or(defaults::APP_DOWNLOAD_TIME)
    }

    pub fn last_review_prompt_time(&self) -> i64 {
        self.last_review_prompt_time
            .unwrap_or(defaults::LAST_REVIEW_PROMPT_TIME)
    }

    pub fn review_prompted(&self) -> bool {
        self.review_prompted.unwrap_or(defaults::REVIEW_PROMPTED)
    }

    pub fn app_background_color(&self) -> u32 {
        self.app_background_color
            .unwrap_or(defaults::APP_BACKGROUND_COLOR)
    }

    pub fn button_background_color(&self) -> u32 {
        self.button_background_color
            .unwrap_or(defaults::BUTTON_BACKGROUND_COLOR)
    }

    pub fn play_button_color(&self) -> u32 {
        self.play_button_color.unwrap_or(defaults::PLAY_BUTTON_COLOR)
    }

    /// The authoritative overlay liveness signal: active iff the last start
    /// strictly postdates the last stop. A service that died while active
    /// leaves this true with no surface held, which is how the controller
    /// detects the inconsistency on restart.
    pub fn overlay_active(&self) -> bool {
        self.foreground_overlay_start_time() > self.foreground_overlay_stop_time()
    }

    /// Sets the area size, clamped to `[0, 1]`.
    pub fn set_overlay_area_size(&mut self, value: f32) {
        self.overlay_area_size = Some(clamp_unit(value));
    }

    /// Sets the speed, clamped to `[0, 1]`.
    pub fn set_overlay_speed(&mut self, value: f32) {
        self.overlay_speed = Some(clamp_unit(value));
    }

    /// Returns a copy with all range-limited fields pulled back into their
    /// documented ranges. The store applies this to every commit, so records
    /// built by arbitrary update closures still satisfy the range
    /// invariants on disk.
    pub fn clamped(mut self) -> AppState {
        if let Some(v) = self.overlay_area_size {
            self.overlay_area_size = Some(clamp_unit(v));
        }
        if let Some(v) = self.overlay_speed {
            self.overlay_speed = Some(clamp_unit(v));
        }
        self
    }
}

fn clamp_unit(value: f32) -> f32 {
    // NaN reads as "no opinion" and falls back to the bottom of the range.
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
