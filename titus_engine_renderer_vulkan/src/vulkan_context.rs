/// GpuContext - shared GPU resources for all Vulkan objects
///
/// Contains everything needed for GPU operations:
/// - Device for Vulkan API calls
/// - Allocator for memory management
/// - Queue for command submission
/// - Command pool for one-shot upload operations
/// - Device limits the core needs (offset alignment, atom size)
///
/// Instance/device bring-up, swapchain negotiation and physical-device
/// selection happen outside this crate; the integrating application builds
/// a GpuContext from its ready device and hands it to the core.

use ash::vk;
use gpu_allocator::vulkan::Allocator;
use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex};

use titus_engine::{engine_err, DeviceLimits, Error, Result};

/// Shared GPU context for all Vulkan resources.
///
/// Shared (via `Arc`) by all GPU resources to avoid duplicating
/// device/allocator/queue references in each resource.
///
/// Note: device and instance destruction stays with the application that
/// created them; this context only releases the allocator's heaps, which
/// must happen while the device is still alive.
pub struct GpuContext {
    /// Vulkan logical device
    pub device: ash::Device,

    /// GPU memory allocator (shared, requires mutex for thread safety).
    /// Wrapped in ManuallyDrop so it is dropped before the caller destroys
    /// the device.
    pub allocator: ManuallyDrop<Arc<Mutex<Allocator>>>,

    /// Graphics queue for command submission
    pub graphics_queue: vk::Queue,

    /// Graphics queue family index
    pub graphics_queue_family: u32,

    /// Reusable command pool for one-shot upload operations
    /// (created with TRANSIENT + RESET_COMMAND_BUFFER flags)
    pub upload_command_pool: Mutex<vk::CommandPool>,

    /// Device capability values captured at bring-up
    pub limits: DeviceLimits,
}

impl GpuContext {
    /// Create a new GPU context from externally-created handles
    pub fn new(
        device: ash::Device,
        allocator: Arc<Mutex<Allocator>>,
        graphics_queue: vk::Queue,
        graphics_queue_family: u32,
        upload_command_pool: vk::CommandPool,
        limits: DeviceLimits,
    ) -> Self {
        Self {
            device,
            allocator: ManuallyDrop::new(allocator),
            graphics_queue,
            graphics_queue_family,
            upload_command_pool: Mutex::new(upload_command_pool),
            limits,
        }
    }

    /// Capture the limits the core needs from physical-device properties
    pub fn limits_from_properties(properties: &vk::PhysicalDeviceProperties) -> DeviceLimits {
        DeviceLimits {
            min_uniform_buffer_offset_alignment: properties.limits.min_uniform_buffer_offset_alignment,
            non_coherent_atom_size: properties.limits.non_coherent_atom_size,
        }
    }

    /// Record and submit a one-shot command buffer, waiting for completion.
    ///
    /// Blocking (queue_wait_idle); intended for setup-time transfers, not
    /// the per-frame path.
    pub fn submit_one_shot<F>(&self, record: F) -> Result<()>
    where
        F: FnOnce(vk::CommandBuffer),
    {
        let pool = self
            .upload_command_pool
            .lock()
            .map_err(|_| Error::Backend("upload command pool lock poisoned".to_string()))?;

        unsafe {
            let allocate_info = vk::CommandBufferAllocateInfo::default()
                .command_pool(*pool)
                .level(vk::CommandBufferLevel::PRIMARY)
                .command_buffer_count(1);

            let command_buffers = self
                .device
                .allocate_command_buffers(&allocate_info)
                .map_err(|e| {
                    engine_err!("titus::vulkan", "Failed to allocate one-shot command buffer: {:?}", e)
                })?;
            let command_buffer = command_buffers[0];

            let result = (|| {
                let begin_info = vk::CommandBufferBeginInfo::default()
                    .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

                self.device
                    .begin_command_buffer(command_buffer, &begin_info)
                    .map_err(|e| {
                        engine_err!("titus::vulkan", "Failed to begin one-shot command buffer: {:?}", e)
                    })?;

                record(command_buffer);

                self.device.end_command_buffer(command_buffer).map_err(|e| {
                    engine_err!("titus::vulkan", "Failed to end one-shot command buffer: {:?}", e)
                })?;

                let command_buffers_submit = [command_buffer];
                let submit_info = vk::SubmitInfo::default().command_buffers(&command_buffers_submit);

                self.device
                    .queue_submit(self.graphics_queue, &[submit_info], vk::Fence::null())
                    .map_err(|e| {
                        engine_err!("titus::vulkan", "Failed to submit one-shot command buffer: {:?}", e)
                    })?;

                self.device.queue_wait_idle(self.graphics_queue).map_err(|e| {
                    engine_err!("titus::vulkan", "Failed to wait for one-shot submission: {:?}", e)
                })
            })();

            self.device
                .free_command_buffers(*pool, &[command_buffer]);

            result
        }
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        // The allocator must release its heaps while the device is alive;
        // the device itself is destroyed by the application that created it.
        unsafe {
            ManuallyDrop::drop(&mut self.allocator);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_context_tests.rs"]
mod tests;
