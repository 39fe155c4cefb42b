//! Central error types for the overlay.
//!
//! Every Win32/D3D11 call that can fail surfaces one of these variants.
//! All errors implement `Serialize` so Tauri can hand them to the frontend.

use serde::Serialize;
use thiserror::Error;

/// Main error type for overlay operations.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// RegisterClassExW failed
    #[error("Window class registration failed: {0}")]
    ClassRegistration(String),

    /// CreateWindowExW failed
    #[error("Window creation failed: {0}")]
    WindowCreation(String),

    /// SetLayeredWindowAttributes failed
    #[error("Failed to set layered window attributes: {0}")]
    LayeredAttributes(String),

    /// D3D11 device or immediate context could not be created
    #[error("D3D11 device creation failed: {0}")]
    DeviceCreation(String),

    /// Swap chain creation or query failed
    #[error("Swap chain error: {0}")]
    SwapChain(String),

    /// The native overlay only exists on Windows
    #[error("Native overlay is not supported on this platform")]
    Unsupported,

    /// Global shortcut registration failed
    #[error("Shortcut error: {0}")]
    Shortcut(String),

    /// Settings store could not be read or written
    #[error("Settings store error: {0}")]
    Store(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tauri requires command errors to be serializable; send the message string.
impl Serialize for OverlayError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Extension trait for tagging foreign errors with an overlay variant.
///
/// ```ignore
/// use crate::error::{OverlayError, ResultExt};
///
/// store.save().map_overlay_err(OverlayError::Store, "failed to save settings")?;
/// ```
pub trait ResultExt<T> {
    /// Map the error into a specific variant, prefixing it with `msg`.
    fn map_overlay_err(self, variant: fn(String) -> OverlayError, msg: &str) -> OverlayResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn map_overlay_err(self, variant: fn(String) -> OverlayError, msg: &str) -> OverlayResult<T> {
        self.map_err(|e| variant(format!("{}: {}", msg, e)))
    }
}

/// Type alias for Results using OverlayError.
pub type OverlayResult<T> = Result<T, OverlayError>;
