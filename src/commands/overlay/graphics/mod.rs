//! Graphics resource creation for the overlay.
//!
//! - `d3d` - D3D11 device, immediate context and DXGI swap chain

pub mod d3d;

pub use d3d::GraphicsResources;
