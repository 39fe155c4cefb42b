//! Global hotkey that toggles the overlay.
//!
//! The accelerator comes from `OverlayConfig::shortcut`. The hotkey callback
//! hops to the main thread before touching the overlay window.

use tauri::{AppHandle, Emitter, Manager, Runtime};

use crate::commands::overlay::OverlayHandle;
use crate::config;
use crate::error::OverlayResult;

/// Event emitted to the frontend after the hotkey toggled the overlay.
pub const OVERLAY_TOGGLED_EVENT: &str = "overlay-toggled";

/// Toggle the overlay on the main thread and notify the frontend.
fn toggle_from_hotkey<R: Runtime>(app: &AppHandle<R>) {
    let handle = app.clone();
    let result = app.run_on_main_thread(move || {
        let foreground = config::overlay::current().foreground_on_show;
        let status = handle.state::<OverlayHandle>().toggle(foreground);
        log::debug!("[shortcut] Toggled overlay: {:?}", status.state);
        let _ = handle.emit(OVERLAY_TOGGLED_EVENT, status);
    });

    if let Err(e) = result {
        log::error!("[shortcut] Failed to dispatch toggle to main thread: {}", e);
    }
}

/// (Re-)register the toggle hotkey from the current configuration.
///
/// Clears every previously registered shortcut first.
#[cfg(desktop)]
pub fn register_toggle_shortcut<R: Runtime>(app: &AppHandle<R>) -> OverlayResult<()> {
    use crate::error::{OverlayError, ResultExt};
    use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};

    let manager = app.global_shortcut();
    if let Err(e) = manager.unregister_all() {
        log::warn!("[shortcut] Failed to clear shortcuts: {}", e);
    }

    let config = config::overlay::current();
    if !config.shortcut_enabled {
        log::info!("[shortcut] Toggle shortcut disabled");
        return Ok(());
    }

    manager
        .on_shortcut(config.shortcut.as_str(), |app, _shortcut, event| {
            if event.state == ShortcutState::Pressed {
                toggle_from_hotkey(app);
            }
        })
        .map_overlay_err(OverlayError::Shortcut, &config.shortcut)?;

    log::info!("[shortcut] Registered toggle shortcut {}", config.shortcut);
    Ok(())
}

#[cfg(not(desktop))]
pub fn register_toggle_shortcut<R: Runtime>(_app: &AppHandle<R>) -> OverlayResult<()> {
    Ok(())
}

/// Drop every registered shortcut (app exit).
pub fn unregister_all<R: Runtime>(app: &AppHandle<R>) {
    #[cfg(desktop)]
    {
        use tauri_plugin_global_shortcut::GlobalShortcutExt;
        if let Err(e) = app.global_shortcut().unregister_all() {
            log::warn!("[shortcut] Failed to unregister shortcuts: {}", e);
        }
    }
    #[cfg(not(desktop))]
    let _ = app;
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// Change the toggle hotkey, re-register and persist it.
///
/// An empty string restores the default accelerator. An accelerator that
/// does not parse or cannot be registered leaves the current one active.
#[tauri::command]
pub fn update_overlay_shortcut(app: AppHandle, shortcut: String) -> OverlayResult<()> {
    let mut updated = config::overlay::current();
    updated.shortcut = shortcut;
    updated.shortcut_enabled = true;
    config::overlay::commit(updated, || register_toggle_shortcut(&app))?;
    config::overlay::save(&app)
}
