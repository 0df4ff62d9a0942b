//! String-keyed field access for scriptable control surfaces.
//!
//! The CLI's `get`/`set` commands address record fields by name. Values are
//! parsed from and rendered to plain strings; colors use `#AARRGGBB` hex,
//! enums use their snake_case names.

use crate::AppState;
use crate::modes::{DrawingMode, OverlayColorScheme};

/// All addressable field names, in record order.
pub const FIELD_NAMES: &[&str] = &[
    "onboarded",
    "onboarded_accessibility_settings",
    "quick_settings_tile_added",
    "drawing_mode",
    "overlay_color_scheme",
    "overlay_area_size",
    "overlay_speed",
    "foreground_overlay_start_time",
    "foreground_overlay_stop_time",
    "app_download_time",
    "last_review_prompt_time",
    "review_prompted",
    "app_background_color",
    "button_background_color",
    "play_button_color",
];

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// The name does not match any record field.
    #[error("unknown field `{0}`")]
    UnknownField(String),
    /// The raw value could not be parsed as the field's type.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl AppState {
    /// Returns the field's effective value (default substituted when unset)
    /// rendered as a string.
    pub fn get_field(&self, name: &str) -> Result<String, FieldError> {
        let value = match name {
            "onboarded" => self.onboarded().to_string(),
            "onboarded_accessibility_settings" => {
                self.onboarded_accessibility_settings().to_string()
            }
            "quick_settings_tile_added" => self.quick_settings_tile_added().to_string(),
            "drawing_mode" => self.drawing_mode().to_string(),
            "overlay_color_scheme" => self.overlay_color_scheme().to_string(),
            "overlay_area_size" => self.overlay_area_size().to_string(),
            "overlay_speed" => self.overlay_speed().to_string(),
            "foreground_overlay_start_time" => self.foreground_overlay_start_time().to_string(),
            "foreground_overlay_stop_time" => self.foreground_overlay_stop_time().to_string(),
            "app_download_time" => self.app_download_time().to_string(),
            "last_review_prompt_time" => self.last_review_prompt_time().to_string(),
            "review_prompted" => self.review_prompted().to_string(),
            "app_background_color" => format_argb(self.app_background_color()),
            "button_background_color" => format_argb(self.button_background_color()),
            "play_button_color" => format_argb(self.play_button_color()),
            other => return Err(FieldError::UnknownField(other.to_string())),
        };
        Ok(value)
    }

    /// Parses `raw` and writes it into the named field. Range-limited
    /// fields are clamped, matching the store's commit behavior.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), FieldError> {
        match name {
            "onboarded" => self.onboarded = Some(parse(name, raw)?),
            "onboarded_accessibility_settings" => {
                self.onboarded_accessibility_settings = Some(parse(name, raw)?)
            }
            "quick_settings_tile_added" => self.quick_settings_tile_added = Some(parse(name, raw)?),
            "drawing_mode" => {
                self.drawing_mode = Some(parse_enum::<DrawingMode>(name, raw)?);
            }
            "overlay_color_scheme" => {
                self.overlay_color_scheme = Some(parse_enum::<OverlayColorScheme>(name, raw)?);
            }
            "overlay_area_size" => self.set_overlay_area_size(parse(name, raw)?),
            "overlay_speed" => self.set_overlay_speed(parse(name, raw)?),
            "foreground_overlay_start_time" => {
                self.foreground_overlay_start_time = Some(parse(name, raw)?)
            }
            "foreground_overlay_stop_time" => {
                self.foreground_overlay_stop_time = Some(parse(name, raw)?)
            }
            "app_download_time" => self.app_download_time = Some(parse(name, raw)?),
            "last_review_prompt_time" => self.last_review_prompt_time = Some(parse(name, raw)?),
            "review_prompted" => self.review_prompted = Some(parse(name, raw)?),
            "app_background_color" => self.app_background_color = Some(parse_argb(name, raw)?),
            "button_background_color" => {
                self.button_background_color = Some(parse_argb(name, raw)?)
            }
            "play_button_color" => self.play_button_color = Some(parse_argb(name, raw)?),
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, FieldError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| FieldError::InvalidValue {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

fn parse_enum<T: std::str::FromStr<Err = String>>(field: &str, raw: &str) -> Result<T, FieldError> {
    raw.parse().map_err(|reason| FieldError::InvalidValue {
        field: field.to_string(),
        reason,
    })
}

fn format_argb(value: u32) -> String {
    format!("#{value:08X}")
}

fn parse_argb(field: &str, raw: &str) -> Result<u32, FieldError> {
    let digits = raw.strip_prefix('#').unwrap_or(raw);
    u32::from_str_radix(digits, 16).map_err(|e| FieldError::InvalidValue {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_field_is_gettable() {
        let state = AppState::default();
        for name in FIELD_NAMES {
            state.get_field(name).unwrap();
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut state = AppState::default();
        state.set_field("drawing_mode", "draw_over_other_apps").unwrap();
        assert_eq!(state.drawing_mode(), DrawingMode::DrawOverOtherApps);
        state.set_field("overlay_speed", "0.25").unwrap();
        assert_eq!(state.get_field("overlay_speed").unwrap(), "0.25");
        state.set_field("app_background_color", "#FF336699").unwrap();
        assert_eq!(state.get_field("app_background_color").unwrap(), "#FF336699");
    }

    #[test]
    fn out_of_range_floats_clamp_on_set() {
        let mut state = AppState::default();
        state.set_field("overlay_area_size", "3.5").unwrap();
        assert_eq!(state.overlay_area_size(), 1.0);
    }

    #[test]
    fn unknown_field_and_bad_value_are_reported() {
        let mut state = AppState::default();
        assert!(matches!(
            state.set_field("no_such_field", "1"),
            Err(FieldError::UnknownField(_))
        ));
        assert!(matches!(
            state.set_field("overlay_speed", "fast"),
            Err(FieldError::InvalidValue { .. })
        ));
    }
}
