/// Renderer trait - factory interface for backend GPU resources

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{Buffer, BufferDesc};

/// Device capability values the core needs from the backend
#[derive(Debug, Clone, Copy)]
pub struct DeviceLimits {
    /// Minimum uniform-buffer offset alignment in bytes.
    ///
    /// 0 is a valid value meaning "no alignment requirement".
    pub min_uniform_buffer_offset_alignment: u64,

    /// Non-coherent atom size in bytes (granularity of mapped-range flushes)
    pub non_coherent_atom_size: u64,
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self {
            min_uniform_buffer_offset_alignment: 256,
            non_coherent_atom_size: 64,
        }
    }
}

/// Main renderer trait
///
/// The central factory interface for creating GPU resources, implemented by
/// backend-specific renderers (e.g. the Vulkan backend). Construction of the
/// backend itself (instance, device, swapchain) is collaborator plumbing and
/// happens outside this trait.
pub trait Renderer: Send + Sync {
    /// Create a buffer
    ///
    /// # Arguments
    ///
    /// * `desc` - Buffer descriptor (size, usage, residency)
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Device capability values (alignment requirements, atom sizes)
    fn limits(&self) -> DeviceLimits;

    /// Wait for all GPU operations to complete
    fn wait_idle(&self) -> Result<()>;
}
