/// Renderer module - backend-facing traits and per-instance uniform packing

// Module declarations
pub mod buffer;
pub mod draw;
pub mod dynamic_uniform;
pub mod renderer;

#[cfg(test)]
pub mod mock_renderer;

// Re-export from the individual modules
pub use buffer::*;
pub use draw::*;
pub use dynamic_uniform::*;
pub use renderer::*;
