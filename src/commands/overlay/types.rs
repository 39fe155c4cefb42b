//! Type definitions for the overlay.
//!
//! Constants, the platform-independent surface description and the status
//! reported to the frontend.

use serde::Serialize;
use ts_rs::TS;

use crate::error::{OverlayError, OverlayResult};

// ============================================================================
// Constants
// ============================================================================

/// Window class name for Win32 registration
pub const OVERLAY_CLASS_NAME: &str = "MicOverlayClass";

/// Number of swap chain buffers (double buffering)
pub const SWAP_CHAIN_BUFFER_COUNT: u32 = 2;

// ============================================================================
// Geometry
// ============================================================================

/// Pixel size of the primary display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../ui/types/")]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Build from `GetSystemMetrics` values. It returns 0 on failure.
    pub fn from_metrics(cx: i32, cy: i32) -> OverlayResult<Self> {
        if cx <= 0 || cy <= 0 {
            return Err(OverlayError::WindowCreation(format!(
                "GetSystemMetrics reported a {}x{} primary screen",
                cx, cy
            )));
        }
        Ok(Self::new(cx as u32, cy as u32))
    }
}

// ============================================================================
// Presentation Surface
// ============================================================================

/// Back buffer pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/types/")]
pub enum SurfaceFormat {
    /// 8 bits per channel RGBA, normalized (`DXGI_FORMAT_R8G8B8A8_UNORM`)
    Rgba8Unorm,
    /// Anything else DXGI reported, by raw format id
    Other(u32),
}

/// Snapshot of the swap chain description, read back from DXGI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/types/")]
pub struct SurfaceDesc {
    pub width: u32,
    pub height: u32,
    pub buffer_count: u32,
    pub format: SurfaceFormat,
}

impl SurfaceDesc {
    /// The description install asks DXGI for.
    pub fn requested(size: ScreenSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            buffer_count: SWAP_CHAIN_BUFFER_COUNT,
            format: SurfaceFormat::Rgba8Unorm,
        }
    }
}

// ============================================================================
// Status
// ============================================================================

/// Lifecycle state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/types/")]
pub enum OverlayState {
    Uninstalled,
    Shown,
    Hidden,
}

/// What the frontend gets back from every overlay command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/types/")]
pub struct OverlayStatus {
    pub state: OverlayState,
    /// Present once installed
    pub surface: Option<SurfaceDesc>,
}

impl OverlayStatus {
    pub const UNINSTALLED: OverlayStatus = OverlayStatus {
        state: OverlayState::Uninstalled,
        surface: None,
    };
}
