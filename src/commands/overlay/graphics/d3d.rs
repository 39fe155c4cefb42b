//! Direct3D 11 device and swap chain creation.
//!
//! The overlay gets a hardware device with BGRA support and a windowed,
//! double-buffered RGBA8 swap chain bound to its HWND. Nothing is presented
//! yet; the chain exists so a renderer can be attached later.

use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct3D::{D3D_DRIVER_TYPE_HARDWARE, D3D_FEATURE_LEVEL};
use windows::Win32::Graphics::Direct3D11::{
    D3D11CreateDeviceAndSwapChain, ID3D11Device, ID3D11DeviceContext,
    D3D11_CREATE_DEVICE_BGRA_SUPPORT, D3D11_SDK_VERSION,
};
use windows::Win32::Graphics::Dxgi::Common::{
    DXGI_FORMAT, DXGI_FORMAT_R8G8B8A8_UNORM, DXGI_MODE_DESC, DXGI_SAMPLE_DESC,
};
use windows::Win32::Graphics::Dxgi::{
    IDXGISwapChain, DXGI_SWAP_CHAIN_DESC, DXGI_SWAP_EFFECT_DISCARD,
    DXGI_USAGE_RENDER_TARGET_OUTPUT,
};

use super::super::types::{ScreenSize, SurfaceDesc, SurfaceFormat, SWAP_CHAIN_BUFFER_COUNT};
use crate::error::{OverlayError, OverlayResult, ResultExt};

/// Device, immediate context and swap chain for one overlay window.
///
/// Fields drop in declaration order, so the swap chain is released before
/// the context and the device it was created from.
pub struct GraphicsResources {
    pub swap_chain: IDXGISwapChain,
    pub context: ID3D11DeviceContext,
    pub device: ID3D11Device,
}

impl Drop for GraphicsResources {
    fn drop(&mut self) {
        unsafe {
            self.context.ClearState();
            self.context.Flush();
        }
    }
}

/// Build the swap chain description for a window of `size`.
pub fn swap_chain_desc(hwnd: HWND, size: ScreenSize) -> DXGI_SWAP_CHAIN_DESC {
    DXGI_SWAP_CHAIN_DESC {
        BufferDesc: DXGI_MODE_DESC {
            Width: size.width,
            Height: size.height,
            Format: DXGI_FORMAT_R8G8B8A8_UNORM,
            ..Default::default()
        },
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
        BufferCount: SWAP_CHAIN_BUFFER_COUNT,
        OutputWindow: hwnd,
        Windowed: true.into(),
        SwapEffect: DXGI_SWAP_EFFECT_DISCARD,
        Flags: 0,
    }
}

/// Create a hardware D3D11 device, its immediate context and a swap chain
/// targeting `hwnd`.
pub fn create_device_and_swap_chain(hwnd: HWND, size: ScreenSize) -> OverlayResult<GraphicsResources> {
    let desc = swap_chain_desc(hwnd, size);

    let mut swap_chain: Option<IDXGISwapChain> = None;
    let mut device: Option<ID3D11Device> = None;
    let mut context: Option<ID3D11DeviceContext> = None;
    let mut feature_level = D3D_FEATURE_LEVEL::default();

    unsafe {
        D3D11CreateDeviceAndSwapChain(
            None,
            D3D_DRIVER_TYPE_HARDWARE,
            None,
            D3D11_CREATE_DEVICE_BGRA_SUPPORT,
            None,
            D3D11_SDK_VERSION,
            Some(&desc),
            Some(&mut swap_chain),
            Some(&mut device),
            Some(&mut feature_level),
            Some(&mut context),
        )
        .map_overlay_err(OverlayError::DeviceCreation, "D3D11CreateDeviceAndSwapChain")?;
    }

    let device = device
        .ok_or_else(|| OverlayError::DeviceCreation("no device returned".to_string()))?;
    let context = context
        .ok_or_else(|| OverlayError::DeviceCreation("no immediate context returned".to_string()))?;
    let swap_chain =
        swap_chain.ok_or_else(|| OverlayError::SwapChain("no swap chain returned".to_string()))?;

    log::info!(
        "[d3d] Created device (feature level {:#x}) and {}-buffer swap chain {}x{}",
        feature_level.0,
        SWAP_CHAIN_BUFFER_COUNT,
        size.width,
        size.height
    );

    Ok(GraphicsResources {
        swap_chain,
        context,
        device,
    })
}

/// Map a DXGI format onto the surface formats the frontend knows.
pub fn surface_format(format: DXGI_FORMAT) -> SurfaceFormat {
    if format == DXGI_FORMAT_R8G8B8A8_UNORM {
        SurfaceFormat::Rgba8Unorm
    } else {
        SurfaceFormat::Other(format.0 as u32)
    }
}

/// Read the swap chain description back from DXGI.
pub fn read_surface_desc(swap_chain: &IDXGISwapChain) -> OverlayResult<SurfaceDesc> {
    let desc = unsafe { swap_chain.GetDesc() }
        .map_overlay_err(OverlayError::SwapChain, "IDXGISwapChain::GetDesc")?;

    Ok(SurfaceDesc {
        width: desc.BufferDesc.Width,
        height: desc.BufferDesc.Height,
        buffer_count: desc.BufferCount,
        format: surface_format(desc.BufferDesc.Format),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_chain_desc_matches_overlay_requirements() {
        let desc = swap_chain_desc(HWND::default(), ScreenSize::new(2560, 1440));
        assert_eq!(desc.BufferCount, 2);
        assert_eq!(desc.BufferDesc.Width, 2560);
        assert_eq!(desc.BufferDesc.Height, 1440);
        assert_eq!(desc.BufferDesc.Format, DXGI_FORMAT_R8G8B8A8_UNORM);
        assert_eq!(desc.SwapEffect, DXGI_SWAP_EFFECT_DISCARD);
        assert!(desc.Windowed.as_bool());
        assert_eq!(desc.SampleDesc.Count, 1);
    }

    #[test]
    fn test_surface_format_mapping() {
        assert_eq!(surface_format(DXGI_FORMAT_R8G8B8A8_UNORM), SurfaceFormat::Rgba8Unorm);
        assert_eq!(
            surface_format(windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_B8G8R8A8_UNORM),
            SurfaceFormat::Other(87)
        );
    }
}
