//! Application configuration management.
//!
//! `OverlayConfig` lives behind a `parking_lot::RwLock` so the frontend can
//! batch-update it in one IPC call, and is persisted with `tauri-plugin-store`.

pub mod overlay;

pub use overlay::OverlayConfig;
