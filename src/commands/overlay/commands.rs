//! Tauri commands the frontend uses to drive the overlay.
//!
//! All of them are synchronous so Tauri runs them on the main thread, which
//! is the thread whose event loop pumps the overlay window's messages.

use tauri::State;

use super::types::OverlayStatus;
use super::OverlayHandle;
use crate::config;
use crate::error::OverlayResult;

/// Create the overlay window, D3D11 device and swap chain.
#[tauri::command]
pub fn install_hooks(overlay: State<'_, OverlayHandle>) -> OverlayResult<OverlayStatus> {
    let config = config::overlay::current();
    log::info!("[install_hooks] Installing overlay with {:?}", config);
    overlay.install(&config).map_err(|e| {
        log::error!("[install_hooks] {}", e);
        e
    })
}

/// Show the overlay and bring it to the foreground.
#[tauri::command]
pub fn show_overlay(overlay: State<'_, OverlayHandle>) -> OverlayStatus {
    overlay.show(config::overlay::current().foreground_on_show)
}

/// Hide the overlay.
#[tauri::command]
pub fn hide_overlay(overlay: State<'_, OverlayHandle>) -> OverlayStatus {
    overlay.hide()
}

/// Flip overlay visibility.
#[tauri::command]
pub fn toggle_overlay(overlay: State<'_, OverlayHandle>) -> OverlayStatus {
    overlay.toggle(config::overlay::current().foreground_on_show)
}

/// Destroy the overlay and its GPU resources.
#[tauri::command]
pub fn release_overlay(overlay: State<'_, OverlayHandle>) -> OverlayStatus {
    overlay.release()
}

/// Current overlay status.
#[tauri::command]
pub fn get_overlay_status(overlay: State<'_, OverlayHandle>) -> OverlayStatus {
    overlay.status()
}
