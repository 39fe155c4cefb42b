//! Overlay controller and its state machine.
//!
//! ```text
//! UNINSTALLED --install--> SHOWN <--hide/show/toggle--> HIDDEN
//!      ^                     |                            |
//!      +------release--------+----------------------------+
//! ```
//!
//! The controller is owned by the host (Tauri managed state) instead of living
//! in process-wide statics. It is generic over [`OverlaySurface`] so the state
//! machine can be exercised without a desktop session.

use parking_lot::Mutex;

use super::types::{OverlayState, OverlayStatus, SurfaceDesc};
use crate::config::OverlayConfig;
use crate::error::OverlayResult;

/// A live overlay: window plus presentation surface.
pub trait OverlaySurface: Sized {
    /// Create the window and its GPU surface. The overlay starts visible.
    ///
    /// Creation is all-or-nothing: on error nothing stays allocated.
    fn create(config: &OverlayConfig) -> OverlayResult<Self>;

    /// Make the overlay visible, optionally taking the foreground.
    fn show(&mut self, foreground: bool);

    /// Make the overlay invisible; it stays allocated.
    fn hide(&mut self);

    /// Description of the presentation surface as created.
    fn surface_desc(&self) -> SurfaceDesc;

    /// Tear down in reverse creation order.
    fn release(self) {
        drop(self);
    }
}

struct Installed<S> {
    surface: S,
    visible: bool,
}

/// Owns at most one overlay and answers install/show/hide.
pub struct OverlayController<S: OverlaySurface> {
    installed: Mutex<Option<Installed<S>>>,
}

impl<S: OverlaySurface> Default for OverlayController<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: OverlaySurface> OverlayController<S> {
    pub fn new() -> Self {
        Self {
            installed: Mutex::new(None),
        }
    }

    fn status_of(installed: &Option<Installed<S>>) -> OverlayStatus {
        match installed {
            Some(inst) => OverlayStatus {
                state: if inst.visible {
                    OverlayState::Shown
                } else {
                    OverlayState::Hidden
                },
                surface: Some(inst.surface.surface_desc()),
            },
            None => OverlayStatus::UNINSTALLED,
        }
    }

    /// Current status.
    pub fn status(&self) -> OverlayStatus {
        Self::status_of(&self.installed.lock())
    }

    /// Create the overlay window and GPU surface.
    ///
    /// An already installed overlay is released first, so re-installing never
    /// leaks. If creation fails the controller is left uninstalled.
    pub fn install(&self, config: &OverlayConfig) -> OverlayResult<OverlayStatus> {
        let mut installed = self.installed.lock();

        if let Some(previous) = installed.take() {
            log::warn!("[OverlayController::install] Already installed, releasing previous overlay");
            previous.surface.release();
        }

        let surface = S::create(config)?;
        *installed = Some(Installed {
            surface,
            visible: true,
        });

        let status = Self::status_of(&installed);
        log::info!("[OverlayController::install] Installed: {:?}", status);
        Ok(status)
    }

    /// Show the overlay. No-op when not installed.
    pub fn show(&self, foreground: bool) -> OverlayStatus {
        let mut installed = self.installed.lock();
        match installed.as_mut() {
            Some(inst) => {
                inst.surface.show(foreground);
                inst.visible = true;
            }
            None => log::debug!("[OverlayController::show] Not installed, ignoring"),
        }
        Self::status_of(&installed)
    }

    /// Hide the overlay. No-op when not installed.
    pub fn hide(&self) -> OverlayStatus {
        let mut installed = self.installed.lock();
        match installed.as_mut() {
            Some(inst) => {
                inst.surface.hide();
                inst.visible = false;
            }
            None => log::debug!("[OverlayController::hide] Not installed, ignoring"),
        }
        Self::status_of(&installed)
    }

    /// Hide when shown, show when hidden. No-op when not installed.
    pub fn toggle(&self, foreground: bool) -> OverlayStatus {
        let mut installed = self.installed.lock();
        match installed.as_mut() {
            Some(inst) if inst.visible => {
                inst.surface.hide();
                inst.visible = false;
            }
            Some(inst) => {
                inst.surface.show(foreground);
                inst.visible = true;
            }
            None => log::debug!("[OverlayController::toggle] Not installed, ignoring"),
        }
        Self::status_of(&installed)
    }

    /// Destroy swap chain, context, device and window. No-op when not installed.
    pub fn release(&self) -> OverlayStatus {
        let mut installed = self.installed.lock();
        if let Some(inst) = installed.take() {
            inst.surface.release();
            log::info!("[OverlayController::release] Overlay released");
        }
        OverlayStatus::UNINSTALLED
    }
}
