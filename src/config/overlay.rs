//! Overlay configuration.
//!
//! Holds the user-tunable parts of the overlay: window title, transparency
//! color key, composition request, foreground behavior and the toggle hotkey.
//! Window class, swap chain format and buffer count are fixed and live in
//! `commands::overlay::types`.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Runtime};
use tauri_plugin_store::StoreExt;
use ts_rs::TS;

use crate::error::{OverlayError, OverlayResult, ResultExt};

/// Store file the overlay settings are persisted in.
pub const SETTINGS_STORE: &str = "overlay-settings.json";

/// Key of the overlay settings inside the store.
const SETTINGS_KEY: &str = "overlay";

/// Default toggle hotkey.
pub const DEFAULT_SHORTCUT: &str = "CommandOrControl+Shift+V";

/// Longest window title accepted (Win32 caption limit is much larger; keep it sane).
const MAX_TITLE_LEN: usize = 128;

/// An RGB color used as the layered-window transparency key.
///
/// Pixels rendered in exactly this color are not composited, so the
/// default (black) makes every black pixel see-through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/types/")]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorKey {
    pub const BLACK: ColorKey = ColorKey { r: 0, g: 0, b: 0 };

    /// Pack into a Win32 COLORREF value (0x00BBGGRR).
    pub fn to_colorref(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16)
    }
}

/// User preferences for the overlay window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/types/")]
pub struct OverlayConfig {
    /// Caption of the overlay window (never drawn, visible in task tools).
    pub window_title: String,

    /// Color that becomes fully transparent when composited.
    pub color_key: ColorKey,

    /// Ask DWM to enable desktop composition on install.
    /// No-op on Windows 8 and later where composition is always on.
    pub request_composition: bool,

    /// Bring the overlay to the foreground when it is shown.
    pub foreground_on_show: bool,

    /// Accelerator that toggles the overlay (tauri-plugin-global-shortcut syntax).
    pub shortcut: String,

    /// Whether the toggle hotkey is registered at all.
    pub shortcut_enabled: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            window_title: "Mic Overlay".to_string(),
            color_key: ColorKey::BLACK,
            request_composition: true,
            foreground_on_show: true,
            shortcut: DEFAULT_SHORTCUT.to_string(),
            shortcut_enabled: true,
        }
    }
}

impl OverlayConfig {
    /// Validate and normalize settings.
    ///
    /// Blank titles and shortcuts fall back to their defaults; overly long
    /// titles are truncated on a char boundary.
    pub fn validate(&mut self) {
        let title = self.window_title.trim();
        self.window_title = if title.is_empty() {
            Self::default().window_title
        } else {
            title.chars().take(MAX_TITLE_LEN).collect()
        };

        let shortcut = self.shortcut.trim();
        self.shortcut = if shortcut.is_empty() {
            DEFAULT_SHORTCUT.to_string()
        } else {
            shortcut.to_string()
        };
    }
}

/// Check that `shortcut` parses as a global-shortcut accelerator.
#[cfg(desktop)]
pub fn parse_shortcut(shortcut: &str) -> OverlayResult<()> {
    use std::str::FromStr;
    use tauri_plugin_global_shortcut::Shortcut;

    Shortcut::from_str(shortcut)
        .map(|_| ())
        .map_overlay_err(OverlayError::Shortcut, shortcut)
}

#[cfg(not(desktop))]
pub fn parse_shortcut(_shortcut: &str) -> OverlayResult<()> {
    Ok(())
}

lazy_static! {
    /// Global overlay configuration.
    ///
    /// Read on every install/show, so changes apply to the next overlay
    /// rather than the live one (except `foregroundOnShow`).
    pub static ref OVERLAY_CONFIG: RwLock<OverlayConfig> = RwLock::new(OverlayConfig::default());
}

/// Snapshot of the current configuration.
pub fn current() -> OverlayConfig {
    OVERLAY_CONFIG.read().clone()
}

/// Replace the configuration after validating it. Returns the stored value.
pub fn replace(mut config: OverlayConfig) -> OverlayConfig {
    config.validate();
    *OVERLAY_CONFIG.write() = config.clone();
    config
}

/// Validate `config` and make it the current configuration.
///
/// An unparseable shortcut is rejected before anything changes. When the
/// shortcut or its enabled flag changed, `register` runs against the new
/// configuration; if it fails the previous configuration is restored and
/// `register` runs once more to bring its hotkey back.
pub fn commit<F>(mut config: OverlayConfig, register: F) -> OverlayResult<OverlayConfig>
where
    F: Fn() -> OverlayResult<()>,
{
    config.validate();
    parse_shortcut(&config.shortcut)?;

    let previous = current();
    let stored = replace(config);

    let shortcut_changed = previous.shortcut != stored.shortcut
        || previous.shortcut_enabled != stored.shortcut_enabled;
    if !shortcut_changed {
        return Ok(stored);
    }

    if let Err(e) = register() {
        log::warn!("[config] Hotkey registration failed, restoring previous config: {}", e);
        replace(previous);
        if let Err(restore) = register() {
            log::error!("[config] Failed to restore previous hotkey: {}", restore);
        }
        return Err(e);
    }

    Ok(stored)
}

/// Decode the persisted settings entry.
///
/// Missing or malformed entries yield the defaults; a stored shortcut that no
/// longer parses falls back to the default accelerator.
fn from_stored(value: Option<serde_json::Value>) -> OverlayConfig {
    let Some(value) = value else {
        return OverlayConfig::default();
    };

    let mut config = match serde_json::from_value::<OverlayConfig>(value) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("[config] Ignoring malformed overlay settings: {}", e);
            return OverlayConfig::default();
        }
    };

    config.validate();
    if let Err(e) = parse_shortcut(&config.shortcut) {
        log::warn!("[config] Ignoring stored shortcut: {}", e);
        config.shortcut = DEFAULT_SHORTCUT.to_string();
    }
    config
}

/// Load persisted settings into the global config.
pub fn load<R: Runtime>(app: &AppHandle<R>) -> OverlayResult<OverlayConfig> {
    let store = app
        .store(SETTINGS_STORE)
        .map_overlay_err(OverlayError::Store, "failed to open settings store")?;

    Ok(replace(from_stored(store.get(SETTINGS_KEY))))
}

/// Persist the current configuration.
pub fn save<R: Runtime>(app: &AppHandle<R>) -> OverlayResult<()> {
    let store = app
        .store(SETTINGS_STORE)
        .map_overlay_err(OverlayError::Store, "failed to open settings store")?;

    store.set(SETTINGS_KEY, serde_json::to_value(current())?);
    store
        .save()
        .map_overlay_err(OverlayError::Store, "failed to save settings store")
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// Get the current overlay configuration.
#[tauri::command]
pub fn get_overlay_config() -> OverlayConfig {
    current()
}

/// Set the entire overlay configuration at once and persist it.
///
/// The hotkey is re-registered when it changed. Nothing is saved when the
/// new hotkey is rejected.
#[tauri::command]
pub fn set_overlay_config(app: AppHandle, config: OverlayConfig) -> OverlayResult<OverlayConfig> {
    log::debug!("[config] set_overlay_config({:?})", config);
    let stored = commit(config, || {
        crate::commands::shortcut::register_toggle_shortcut(&app)
    })?;
    save(&app)?;
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::{Mutex, MutexGuard};
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn test_default_config() {
        let config = OverlayConfig::default();
        assert_eq!(config.window_title, "Mic Overlay");
        assert_eq!(config.color_key, ColorKey::BLACK);
        assert!(config.request_composition);
        assert!(config.foreground_on_show);
        assert_eq!(config.shortcut, "CommandOrControl+Shift+V");
    }

    #[test]
    fn test_colorref_packing() {
        assert_eq!(ColorKey::BLACK.to_colorref(), 0);
        let key = ColorKey { r: 0x11, g: 0x22, b: 0x33 };
        assert_eq!(key.to_colorref(), 0x0033_2211);
    }

    #[test]
    fn test_validate_blank_fields_fall_back() {
        let mut config = OverlayConfig {
            window_title: "   ".to_string(),
            shortcut: String::new(),
            ..Default::default()
        };
        config.validate();
        assert_eq!(config.window_title, "Mic Overlay");
        assert_eq!(config.shortcut, DEFAULT_SHORTCUT);
    }

    #[test]
    fn test_validate_truncates_title() {
        let mut config = OverlayConfig {
            window_title: "é".repeat(300),
            ..Default::default()
        };
        config.validate();
        assert_eq!(config.window_title.chars().count(), MAX_TITLE_LEN);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: OverlayConfig =
            serde_json::from_str(r#"{"foregroundOnShow": false}"#).unwrap();
        assert!(!config.foreground_on_show);
        assert_eq!(config.window_title, "Mic Overlay");
        assert!(config.shortcut_enabled);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(OverlayConfig::default()).unwrap();
        assert!(json.get("colorKey").is_some());
        assert!(json.get("requestComposition").is_some());
        assert!(json.get("window_title").is_none());
    }

    #[test]
    fn test_default_shortcut_parses() {
        assert!(parse_shortcut(DEFAULT_SHORTCUT).is_ok());
        assert!(parse_shortcut("Alt+Shift+O").is_ok());
    }

    #[test]
    fn test_unparseable_shortcuts_rejected() {
        for bad in ["Ctrl+Shift+Nope", "Shift+"] {
            let err = parse_shortcut(bad).unwrap_err();
            assert!(matches!(err, OverlayError::Shortcut(_)), "{bad}");
        }
    }

    #[test]
    fn test_from_stored_missing_uses_defaults() {
        assert_eq!(from_stored(None), OverlayConfig::default());
    }

    #[test]
    fn test_from_stored_malformed_uses_defaults() {
        assert_eq!(from_stored(Some(json!("not an object"))), OverlayConfig::default());
        assert_eq!(
            from_stored(Some(json!({ "colorKey": "red" }))),
            OverlayConfig::default()
        );
    }

    #[test]
    fn test_from_stored_partial_merges_defaults() {
        let config = from_stored(Some(json!({ "windowTitle": "  Mic  ", "shortcutEnabled": false })));
        assert_eq!(config.window_title, "Mic");
        assert!(!config.shortcut_enabled);
        assert_eq!(config.shortcut, DEFAULT_SHORTCUT);
        assert!(config.request_composition);
    }

    #[test]
    fn test_from_stored_replaces_bad_shortcut() {
        let config = from_stored(Some(json!({ "shortcut": "Ctrl+Shift+Nope" })));
        assert_eq!(config.shortcut, DEFAULT_SHORTCUT);
    }

    #[test]
    fn test_saved_value_loads_back() {
        let config = OverlayConfig {
            window_title: "Dictation".to_string(),
            color_key: ColorKey { r: 255, g: 0, b: 255 },
            foreground_on_show: false,
            shortcut: "Alt+Shift+O".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(from_stored(Some(value)), config);
    }

    // The tests below share OVERLAY_CONFIG.
    lazy_static! {
        static ref GLOBAL_CONFIG: Mutex<()> = Mutex::new(());
    }

    fn fresh_global() -> MutexGuard<'static, ()> {
        let guard = GLOBAL_CONFIG.lock();
        replace(OverlayConfig::default());
        guard
    }

    #[test]
    fn test_commit_rejects_bad_shortcut_without_changes() {
        let _guard = fresh_global();
        let calls = Cell::new(0);

        for bad in ["Ctrl+Shift+Nope", "Shift+"] {
            let candidate = OverlayConfig {
                shortcut: bad.to_string(),
                window_title: "Changed".to_string(),
                ..Default::default()
            };
            let err = commit(candidate, || {
                calls.set(calls.get() + 1);
                Ok(())
            })
            .unwrap_err();

            assert!(matches!(err, OverlayError::Shortcut(_)));
            assert_eq!(current(), OverlayConfig::default());
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_commit_registers_only_when_shortcut_changes() {
        let _guard = fresh_global();
        let calls = Cell::new(0);
        let register = || {
            calls.set(calls.get() + 1);
            Ok(())
        };

        let mut config = OverlayConfig {
            window_title: "Renamed".to_string(),
            ..Default::default()
        };
        commit(config.clone(), register).unwrap();
        assert_eq!(calls.get(), 0);

        config.shortcut = "Alt+Shift+O".to_string();
        commit(config.clone(), register).unwrap();
        assert_eq!(calls.get(), 1);

        config.shortcut_enabled = false;
        let stored = commit(config.clone(), register).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(current(), stored);
    }

    #[test]
    fn test_commit_restores_previous_when_registration_fails() {
        let _guard = fresh_global();
        let calls = Cell::new(0);

        let candidate = OverlayConfig {
            shortcut: "Alt+Shift+O".to_string(),
            ..Default::default()
        };
        let err = commit(candidate, || {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(OverlayError::Shortcut("already registered".to_string()))
            } else {
                Ok(())
            }
        })
        .unwrap_err();

        assert!(matches!(err, OverlayError::Shortcut(_)));
        assert_eq!(current(), OverlayConfig::default());
        // Once for the new hotkey, once to restore the old one
        assert_eq!(calls.get(), 2);
    }
}
