//! Win32 window for the overlay.
//!
//! Registers the window class, creates the layered click-through popup and
//! owns its handle. Destroying the handle goes through [`OverlayWindow`]'s
//! `Drop`, which tells the window procedure not to post a quit message.

use std::sync::atomic::{AtomicBool, Ordering};

use windows::core::PCWSTR;
use windows::Win32::Foundation::{
    COLORREF, ERROR_CLASS_ALREADY_EXISTS, HWND, LPARAM, LRESULT, WPARAM,
};
use windows::Win32::Graphics::Dwm::{DwmEnableComposition, DWM_EC_ENABLECOMPOSITION};
use windows::Win32::Graphics::Gdi::UpdateWindow;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetSystemMetrics, IsWindowVisible,
    PostQuitMessage, RegisterClassExW, SetForegroundWindow, SetLayeredWindowAttributes,
    ShowWindow, LWA_COLORKEY, SM_CXSCREEN, SM_CYSCREEN, SW_HIDE, SW_SHOW, WM_DESTROY,
    WNDCLASSEXW, WS_EX_LAYERED, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};

use super::types::{ScreenSize, OVERLAY_CLASS_NAME};
use crate::config::OverlayConfig;
use crate::error::{OverlayError, OverlayResult, ResultExt};

/// Track if the overlay window class has been registered
static OVERLAY_CLASS_REGISTERED: AtomicBool = AtomicBool::new(false);

/// Set while we destroy our own window so WM_DESTROY does not quit the host
static RELEASING: AtomicBool = AtomicBool::new(false);

/// Null-terminated UTF-16 copy of `s`.
fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Pixel size of the primary display.
pub fn primary_screen_size() -> OverlayResult<ScreenSize> {
    unsafe { ScreenSize::from_metrics(GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) }
}

/// Window procedure for the overlay.
///
/// # Safety
/// Win32 callback.
pub unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_DESTROY => {
            if RELEASING.load(Ordering::SeqCst) {
                log::debug!("[wnd_proc] Overlay window destroyed by release");
            } else {
                log::warn!("[wnd_proc] Overlay window destroyed externally, posting quit");
                PostQuitMessage(0);
            }
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Register the overlay window class once per process.
fn register_overlay_class() -> OverlayResult<()> {
    if OVERLAY_CLASS_REGISTERED.load(Ordering::SeqCst) {
        return Ok(());
    }

    unsafe {
        let hinstance = GetModuleHandleW(None)
            .map_overlay_err(OverlayError::ClassRegistration, "GetModuleHandleW")?;

        let class_name = to_wide(OVERLAY_CLASS_NAME);

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            lpfnWndProc: Some(wnd_proc),
            hInstance: hinstance.into(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            ..Default::default()
        };

        if RegisterClassExW(&wc) == 0 {
            let err = windows::core::Error::from_win32();
            // Another module in the process got there first; same name, same proc.
            if err.code() != ERROR_CLASS_ALREADY_EXISTS.to_hresult() {
                return Err(OverlayError::ClassRegistration(err.message().to_string()));
            }
        }

        OVERLAY_CLASS_REGISTERED.store(true, Ordering::SeqCst);
    }

    log::debug!("[register_overlay_class] Registered {}", OVERLAY_CLASS_NAME);
    Ok(())
}

/// Owned overlay window handle.
#[derive(Debug)]
pub struct OverlayWindow {
    hwnd: HWND,
}

impl OverlayWindow {
    /// Create the overlay window and make it visible.
    ///
    /// Layered + transparent + topmost borderless popup covering `size` at (0,0).
    /// `config.color_key` pixels are keyed out.
    pub fn create(config: &OverlayConfig, size: ScreenSize) -> OverlayResult<Self> {
        register_overlay_class()?;

        let window = unsafe {
            let hinstance = GetModuleHandleW(None)
                .map_overlay_err(OverlayError::WindowCreation, "GetModuleHandleW")?;

            let class_name = to_wide(OVERLAY_CLASS_NAME);
            let title = to_wide(&config.window_title);

            let hwnd = CreateWindowExW(
                WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOPMOST,
                PCWSTR(class_name.as_ptr()),
                PCWSTR(title.as_ptr()),
                WS_POPUP,
                0,
                0,
                size.width as i32,
                size.height as i32,
                None,
                None,
                hinstance,
                None,
            )
            .map_overlay_err(OverlayError::WindowCreation, "CreateWindowExW")?;

            OverlayWindow { hwnd }
        };

        // From here on `window` destroys the HWND if a later step fails.
        unsafe {
            SetLayeredWindowAttributes(
                window.hwnd,
                COLORREF(config.color_key.to_colorref()),
                0,
                LWA_COLORKEY,
            )
            .map_overlay_err(OverlayError::LayeredAttributes, "SetLayeredWindowAttributes")?;

            if config.request_composition {
                // Desktop-wide, and always on since Windows 8.
                if let Err(e) = DwmEnableComposition(DWM_EC_ENABLECOMPOSITION) {
                    log::warn!("[OverlayWindow::create] DwmEnableComposition failed: {}", e);
                }
            }

            let _ = ShowWindow(window.hwnd, SW_SHOW);
            let _ = UpdateWindow(window.hwnd);
        }

        log::info!(
            "[OverlayWindow::create] Created overlay {:?} ({}x{})",
            window.hwnd,
            size.width,
            size.height
        );
        Ok(window)
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    /// Show the window, optionally pulling it to the foreground.
    pub fn show(&self, foreground: bool) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOW);
            if foreground && !SetForegroundWindow(self.hwnd).as_bool() {
                log::debug!("[OverlayWindow::show] SetForegroundWindow refused by the shell");
            }
        }
    }

    pub fn hide(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
        }
    }

    pub fn is_visible(&self) -> bool {
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }
}

impl Drop for OverlayWindow {
    fn drop(&mut self) {
        RELEASING.store(true, Ordering::SeqCst);
        unsafe {
            if let Err(e) = DestroyWindow(self.hwnd) {
                log::warn!("[OverlayWindow::drop] DestroyWindow failed: {}", e);
            }
        }
        RELEASING.store(false, Ordering::SeqCst);
    }
}
