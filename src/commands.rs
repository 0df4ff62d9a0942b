//! Subcommand implementations operating on the shared store.
//!
//! `serve` runs the overlay service in this process; every other command
//! is a foreground control surface that reads or writes the store and lets
//! cross-process delivery carry the change to a running service.

use std::sync::Arc;

use anyhow::Context;
use queasy_data::fields::{FIELD_NAMES, FieldError};
use queasy_data::{DrawingMode, now_epoch_ms};
use queasy_overlay::ControlMessage;
use queasy_store::Store;
use tokio::sync::mpsc;

use crate::cli::Command;
use crate::headless;

/// Runs the overlay service until Ctrl-C.
pub fn serve(store: Arc<Store>) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel(16);
    let handle = queasy_overlay::runtime::run(store, headless::platform(), rx);

    ctrlc::set_handler(move || {
        log::info!("Shutdown requested");
        let _ = tx.blocking_send(ControlMessage::Shutdown);
    })
    .context("failed to install shutdown handler")?;

    handle
        .join()
        .map_err(|_| anyhow::anyhow!("overlay service thread panicked"))
}

pub async fn dispatch(store: Arc<Store>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Serve => unreachable!("serve runs outside the async dispatcher"),
        Command::Start => start(&store).await,
        Command::Stop => stop(&store).await,
        Command::Status => {
            status(&store);
            Ok(())
        }
        Command::Get { field } => get(&store, &field),
        Command::Set { field, value } => set(&store, field, value).await,
        Command::Reset => {
            store.reset().await?;
            println!("reset to defaults");
            Ok(())
        }
    }
}

/// Requests an overlay start by making the record's desired state true:
/// the service process observes the commit and performs the transition.
/// A never-chosen drawing mode defaults to draw-over-other-apps.
async fn start(store: &Store) -> anyhow::Result<()> {
    let state = store
        .update(|mut state| {
            if state.drawing_mode() == DrawingMode::None {
                state.drawing_mode = Some(DrawingMode::DrawOverOtherApps);
            }
            state.foreground_overlay_start_time = Some(now_epoch_ms());
            state
        })
        .await?;
    println!("overlay start requested (mode {})", state.drawing_mode());
    Ok(())
}

async fn stop(store: &Store) -> anyhow::Result<()> {
    store
        .update(|mut state| {
            state.foreground_overlay_stop_time = Some(now_epoch_ms());
            state
        })
        .await?;
    println!("overlay stop requested");
    Ok(())
}

fn status(store: &Store) {
    let state = store.read();
    println!(
        "overlay:   {} (start {} / stop {})",
        if state.overlay_active() { "active" } else { "stopped" },
        state.foreground_overlay_start_time(),
        state.foreground_overlay_stop_time(),
    );
    println!("mode:      {}", state.drawing_mode());
    println!("scheme:    {}", state.overlay_color_scheme());
    println!("area size: {}", state.overlay_area_size());
    println!("speed:     {}", state.overlay_speed());
    println!("onboarded: {}", state.onboarded());
}

fn get(store: &Store, field: &str) -> anyhow::Result<()> {
    match store.read().get_field(field) {
        Ok(value) => {
            println!("{value}");
            Ok(())
        }
        Err(err @ FieldError::UnknownField(_)) => {
            eprintln!("known fields: {}", FIELD_NAMES.join(", "));
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

async fn set(store: &Store, field: String, value: String) -> anyhow::Result<()> {
    // Parse failures depend only on the field name and raw value, so
    // validating against a scratch record up front keeps the commit
    // closure infallible.
    let mut probe = store.read();
    if let Err(err) = probe.set_field(&field, &value) {
        if matches!(err, FieldError::UnknownField(_)) {
            eprintln!("known fields: {}", FIELD_NAMES.join(", "));
        }
        return Err(err.into());
    }

    let committed = store
        .update(move |mut state| {
            let _ = state.set_field(&field, &value);
            state
        })
        .await?;
    log::debug!("Committed record: {committed:?}");
    Ok(())
}
