//! The real overlay: a Win32 window with a D3D11 swap chain bound to it.

use super::state::OverlaySurface;
use super::types::SurfaceDesc;
use crate::config::OverlayConfig;
use crate::error::OverlayResult;

#[cfg(windows)]
pub use self::win::NativeOverlay;

#[cfg(not(windows))]
pub use self::unsupported::NativeOverlay;

#[cfg(windows)]
mod win {
    use super::*;
    use crate::commands::overlay::graphics::{d3d, GraphicsResources};
    use crate::commands::overlay::window::{primary_screen_size, OverlayWindow};
    use windows::Win32::Foundation::HWND;

    /// Overlay window plus its GPU resources.
    pub struct NativeOverlay {
        // Declaration order is drop order: GPU resources before their window.
        graphics: GraphicsResources,
        window: OverlayWindow,
        desc: SurfaceDesc,
    }

    // HWND and the D3D11 interfaces are only touched from the thread that
    // created them; the controller's mutex moves ownership, not access.
    unsafe impl Send for NativeOverlay {}

    impl NativeOverlay {
        pub fn hwnd(&self) -> HWND {
            self.window.hwnd()
        }

        pub fn is_visible(&self) -> bool {
            self.window.is_visible()
        }
    }

    impl OverlaySurface for NativeOverlay {
        fn create(config: &OverlayConfig) -> OverlayResult<Self> {
            let size = primary_screen_size()?;
            let window = OverlayWindow::create(config, size)?;
            let graphics = d3d::create_device_and_swap_chain(window.hwnd(), size)?;
            let desc = d3d::read_surface_desc(&graphics.swap_chain)?;

            let requested = SurfaceDesc::requested(size);
            if desc != requested {
                log::warn!(
                    "[NativeOverlay::create] DXGI adjusted the swap chain: requested {:?}, got {:?}",
                    requested,
                    desc
                );
            }

            Ok(Self {
                graphics,
                window,
                desc,
            })
        }

        fn show(&mut self, foreground: bool) {
            self.window.show(foreground);
        }

        fn hide(&mut self) {
            self.window.hide();
        }

        fn surface_desc(&self) -> SurfaceDesc {
            self.desc
        }

        fn release(self) {
            let Self {
                graphics, window, ..
            } = self;
            drop(graphics);
            drop(window);
        }
    }
}

#[cfg(not(windows))]
mod unsupported {
    use super::*;
    use crate::error::OverlayError;

    /// Placeholder on platforms without a native overlay; never constructed.
    pub enum NativeOverlay {}

    impl OverlaySurface for NativeOverlay {
        fn create(_config: &OverlayConfig) -> OverlayResult<Self> {
            Err(OverlayError::Unsupported)
        }

        fn show(&mut self, _foreground: bool) {
            match *self {}
        }

        fn hide(&mut self) {
            match *self {}
        }

        fn surface_desc(&self) -> SurfaceDesc {
            match *self {}
        }
    }
}
