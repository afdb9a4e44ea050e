/*!
# Titus Engine - Vulkan Renderer Backend

Vulkan implementation of the Titus rendering core.

This crate implements the titus_engine renderer traits using the Ash library
for Vulkan bindings and gpu-allocator for memory management. It expects a
ready [`GpuContext`] (device, allocator, graphics queue, upload command pool)
from the integrating application; instance, device and swapchain bring-up
stay outside the crate.
*/

mod vulkan_buffer;
mod vulkan_context;
mod vulkan_mesh_renderer;
mod vulkan_pipeline;
mod vulkan_render_loop;
mod vulkan_renderer;

pub use vulkan_buffer::Buffer;
pub use vulkan_context::GpuContext;
pub use vulkan_mesh_renderer::MeshRenderer;
pub use vulkan_pipeline::{pipeline_loader, VulkanPipeline};
pub use vulkan_render_loop::{FrameState, RenderLoop};
pub use vulkan_renderer::VulkanRenderer;
