/// VulkanRenderer - Vulkan implementation of the engine Renderer trait
///
/// Factory for GPU resources backed by a [`GpuContext`]. Instance, device
/// and swapchain bring-up happen in the integrating application; this
/// renderer only needs the ready context.

use std::sync::Arc;

use titus_engine::{
    engine_err, Buffer as RendererBuffer, BufferDesc, DeviceLimits, Renderer, Result,
};

use crate::vulkan_buffer::Buffer;
use crate::vulkan_context::GpuContext;

/// Vulkan renderer implementation
pub struct VulkanRenderer {
    ctx: Arc<GpuContext>,
}

impl VulkanRenderer {
    /// Create a renderer over an existing GPU context
    pub fn new(ctx: Arc<GpuContext>) -> Self {
        Self { ctx }
    }

    /// Shared GPU context
    pub fn context(&self) -> &Arc<GpuContext> {
        &self.ctx
    }
}

impl Renderer for VulkanRenderer {
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn RendererBuffer>> {
        let buffer = Buffer::new(self.ctx.clone(), desc)?;
        Ok(Arc::new(buffer))
    }

    fn limits(&self) -> DeviceLimits {
        self.ctx.limits
    }

    fn wait_idle(&self) -> Result<()> {
        unsafe {
            self.ctx
                .device
                .device_wait_idle()
                .map_err(|e| engine_err!("titus::vulkan", "Failed to wait for device idle: {:?}", e))
        }
    }
}
