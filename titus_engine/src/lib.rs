/*!
# Titus Engine

Core types and traits for the Titus rendering engine.

This crate provides the platform-agnostic rendering core. Backend
implementations (Vulkan via `titus_engine_renderer_vulkan`) provide the
concrete GPU objects behind the traits defined here.

## Architecture

- **Renderer**: Factory trait for creating GPU buffers and reporting
  device capabilities
- **Buffer**: GPU buffer resource trait
- **DynamicUniformArray**: Packs many per-instance uniform records into one
  buffer using the device's minimum offset alignment
- **ResourceCache**: Deduplicated, loader-dispatched asset cache
- **DrawItem**: One drawable object handed to the backend each frame

Backend implementations provide concrete types that implement these traits.
*/

// Internal modules
mod error;
pub mod log;
pub mod renderer;
pub mod resource;
pub mod utils;

// Error types
pub use error::{Error, Result};

// Renderer types
pub use renderer::{
    align_up, Buffer, BufferDesc, BufferUsage, DeviceLimits, DrawItem, DynamicUniformArray,
    MemoryClass, Renderer,
};

// Resource types
pub use resource::{
    Manifest, Pipeline, Resource, ResourceCache, ResourceData, ResourceLoader,
};

// Re-export math library at crate root
pub use glam;
