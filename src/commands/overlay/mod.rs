//! Click-through Direct3D overlay window.
//!
//! Creates a borderless, topmost, input-transparent window covering the
//! primary display. Black pixels are color-keyed out, so anything a renderer
//! draws in another color floats above every other application. A D3D11
//! device and a double-buffered RGBA8 swap chain are bound to the window.
//!
//! # Architecture
//!
//! ```text
//! mod.rs (public API)
//!   |
//!   +-- types.rs (constants, surface description, status)
//!   +-- state.rs (OverlayController state machine, OverlaySurface seam)
//!   +-- native.rs (Win32 + D3D11 OverlaySurface)
//!   +-- commands.rs (Tauri commands)
//!   +-- window.rs (class registration, window creation, wndproc)
//!   +-- graphics/ (D3D11 device and swap chain)
//! ```

pub mod commands;
#[cfg(windows)]
mod graphics;
mod native;
mod state;
pub mod types;
#[cfg(windows)]
mod window;


pub use native::NativeOverlay;
pub use state::{OverlayController, OverlaySurface};
pub use types::{OverlayState, OverlayStatus, SurfaceDesc, SurfaceFormat};

/// The controller the app manages as Tauri state.
pub type OverlayHandle = OverlayController<NativeOverlay>;
