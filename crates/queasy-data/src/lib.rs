//! Shared application-state model for the overlay utility.
//!
//! This crate defines the single durable record ([`app_state::AppState`])
//! that every process of the installation reads and writes, along with the
//! enums it embeds and a string-keyed field API used by scriptable control
//! surfaces.
//!
//! The design is deliberately lightweight:
//! - The record is plain data with serde derives; persistence and
//!   cross-process coordination live in `queasy-store`.
//! - Every field is optional in the persisted form. "Unset" is distinct
//!   from a field's zero value, and typed accessors substitute a documented
//!   default, so new installations and new fields both read sensibly.

pub mod app_state;
pub mod fields;
pub mod modes;

pub use app_state::AppState;
pub use modes::{DrawingMode, OverlayColorScheme};

/// Version stamp written into every committed record. Readers ignore
/// unknown fields, so bumping this only matters for incompatible changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Milliseconds since the Unix epoch, as stored in the record's
/// timestamp fields.
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
