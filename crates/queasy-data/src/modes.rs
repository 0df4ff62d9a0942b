use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the overlay is presented on top of other apps. This decides which
/// OS mechanism (and which permission) the lifecycle controller uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawingMode {
    /// No mode chosen yet. The overlay never activates in this mode.
    #[default]
    None,
    /// Present the overlay in a system window above other apps. Requires
    /// the draw-over-other-apps permission.
    DrawOverOtherApps,
    /// Present the overlay through the accessibility service. Requires
    /// the accessibility permission.
    AccessibilityService,
}

impl fmt::Display for DrawingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DrawingMode::None => "none",
            DrawingMode::DrawOverOtherApps => "draw_over_other_apps",
            DrawingMode::AccessibilityService => "accessibility_service",
        };
        f.write_str(name)
    }
}

impl FromStr for DrawingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(DrawingMode::None),
            "draw_over_other_apps" => Ok(DrawingMode::DrawOverOtherApps),
            "accessibility_service" => Ok(DrawingMode::AccessibilityService),
            other => Err(format!("unknown drawing mode `{other}`")),
        }
    }
}

/// Color scheme of the moving overlay pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayColorScheme {
    /// Alternating black and white dots. Default value.
    #[default]
    BlackAndWhite,
    /// Black dots only.
    Black,
    /// White dots only.
    White,
}

impl fmt::Display for OverlayColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverlayColorScheme::BlackAndWhite => "black_and_white",
            OverlayColorScheme::Black => "black",
            OverlayColorScheme::White => "white",
        };
        f.write_str(name)
    }
}

impl FromStr for OverlayColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "black_and_white" => Ok(OverlayColorScheme::BlackAndWhite),
            "black" => Ok(OverlayColorScheme::Black),
            "white" => Ok(OverlayColorScheme::White),
            other => Err(format!("unknown color scheme `{other}`")),
        }
    }
}
