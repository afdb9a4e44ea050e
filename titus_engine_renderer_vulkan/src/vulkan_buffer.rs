/// Buffer - Vulkan implementation of the engine Buffer trait
///
/// Owns one device allocation of fixed size. Mapping and unmapping are
/// idempotent; `update` is a scoped map -> copy -> flush -> unmap that
/// runs the release steps on all paths including error.

use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::MemoryLocation;
use std::sync::{Arc, Mutex};

use titus_engine::{
    engine_err, Buffer as RendererBuffer, BufferDesc, BufferUsage, Error, MemoryClass,
    Result,
};

use crate::vulkan_context::GpuContext;

fn usage_to_vk(usage: BufferUsage) -> vk::BufferUsageFlags {
    let mut flags = vk::BufferUsageFlags::empty();
    if usage.contains(BufferUsage::VERTEX) {
        flags |= vk::BufferUsageFlags::VERTEX_BUFFER;
    }
    if usage.contains(BufferUsage::INDEX) {
        flags |= vk::BufferUsageFlags::INDEX_BUFFER;
    }
    if usage.contains(BufferUsage::UNIFORM) {
        flags |= vk::BufferUsageFlags::UNIFORM_BUFFER;
    }
    if usage.contains(BufferUsage::STORAGE) {
        flags |= vk::BufferUsageFlags::STORAGE_BUFFER;
    }
    if usage.contains(BufferUsage::TRANSFER_SRC) {
        flags |= vk::BufferUsageFlags::TRANSFER_SRC;
    }
    if usage.contains(BufferUsage::TRANSFER_DST) {
        flags |= vk::BufferUsageFlags::TRANSFER_DST;
    }
    flags
}

/// Vulkan buffer implementation
pub struct Buffer {
    /// Shared GPU context (device, allocator, queue, upload pool)
    ctx: Arc<GpuContext>,
    /// Vulkan buffer handle
    pub(crate) buffer: vk::Buffer,
    /// GPU memory allocation
    allocation: Option<Allocation>,
    /// Buffer size in bytes
    size: u64,
    /// Memory residency class
    memory: MemoryClass,
    /// Mapped-pointer state (map/unmap are idempotent)
    mapped: Mutex<bool>,
}

impl Buffer {
    /// Create a new Vulkan buffer
    pub fn new(ctx: Arc<GpuContext>, desc: BufferDesc) -> Result<Self> {
        let location = match desc.memory {
            MemoryClass::GpuOnly => MemoryLocation::GpuOnly,
            MemoryClass::CpuToGpu => MemoryLocation::CpuToGpu,
        };

        unsafe {
            let buffer_create_info = vk::BufferCreateInfo::default()
                .size(desc.size)
                .usage(usage_to_vk(desc.usage))
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let buffer = ctx
                .device
                .create_buffer(&buffer_create_info, None)
                .map_err(|e| {
                    Error::Allocation(format!(
                        "failed to create buffer of {} bytes: {:?}",
                        desc.size, e
                    ))
                })?;

            let requirements = ctx.device.get_buffer_memory_requirements(buffer);

            let allocation = ctx
                .allocator
                .lock()
                .unwrap()
                .allocate(&AllocationCreateDesc {
                    name: "buffer",
                    requirements,
                    location,
                    linear: true,
                    allocation_scheme: AllocationScheme::GpuAllocatorManaged,
                })
                .map_err(|e| {
                    ctx.device.destroy_buffer(buffer, None);
                    Error::Allocation(format!(
                        "failed to allocate {} bytes ({:?}): {}",
                        requirements.size, location, e
                    ))
                })?;

            if let Err(e) = ctx
                .device
                .bind_buffer_memory(buffer, allocation.memory(), allocation.offset())
            {
                ctx.allocator.lock().unwrap().free(allocation).ok();
                ctx.device.destroy_buffer(buffer, None);
                return Err(Error::Allocation(format!(
                    "failed to bind buffer memory: {:?}",
                    e
                )));
            }

            Ok(Self {
                ctx,
                buffer,
                allocation: Some(allocation),
                size: desc.size,
                memory: desc.memory,
                mapped: Mutex::new(false),
            })
        }
    }

    /// Obtain host access to the allocation; no-op if already mapped.
    ///
    /// Fails with [`Error::Mapping`] when the allocation is not
    /// host-visible.
    pub fn map(&self) -> Result<()> {
        let mut mapped = self.mapped.lock().unwrap();
        if *mapped {
            return Ok(());
        }
        self.host_ptr()?;
        *mapped = true;
        Ok(())
    }

    /// Release host access; no-op if not mapped
    pub fn unmap(&self) {
        let mut mapped = self.mapped.lock().unwrap();
        *mapped = false;
    }

    /// Make host writes visible to the device.
    ///
    /// Required for non-coherent memory; harmless elsewhere. The flushed
    /// range is aligned down to the device's non-coherent atom size.
    pub fn flush(&self) -> Result<()> {
        if self.memory == MemoryClass::GpuOnly {
            // Nothing host-visible to flush
            return Ok(());
        }
        let allocation = self.allocation()?;
        let atom = self.ctx.limits.non_coherent_atom_size.max(1);
        let offset = allocation.offset() - (allocation.offset() % atom);

        unsafe {
            let range = vk::MappedMemoryRange::default()
                .memory(allocation.memory())
                .offset(offset)
                .size(vk::WHOLE_SIZE);

            self.ctx
                .device
                .flush_mapped_memory_ranges(&[range])
                .map_err(|e| engine_err!("titus::vulkan", "Failed to flush buffer memory: {:?}", e))
        }
    }

    /// Device-side copy of `other`'s full extent into this buffer.
    ///
    /// Submits a one-shot command buffer and waits for it synchronously;
    /// intended for staging-to-device transfers during setup, not the
    /// per-frame path.
    pub fn copy_from(&self, other: &Buffer) -> Result<()> {
        if other.size > self.size {
            return Err(Error::OutOfBounds {
                offset: 0,
                len: other.size,
                size: self.size,
            });
        }

        let region = vk::BufferCopy::default().size(other.size);
        self.ctx.submit_one_shot(|command_buffer| unsafe {
            self.ctx
                .device
                .cmd_copy_buffer(command_buffer, other.buffer, self.buffer, &[region]);
        })
    }

    /// Buffer size in bytes
    pub fn len_bytes(&self) -> u64 {
        self.size
    }

    /// Raw Vulkan buffer handle (for descriptor writes and binds)
    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    fn allocation(&self) -> Result<&Allocation> {
        self.allocation
            .as_ref()
            .ok_or_else(|| Error::Mapping("buffer has no allocation".to_string()))
    }

    fn host_ptr(&self) -> Result<*mut u8> {
        self.allocation()?
            .mapped_ptr()
            .map(|ptr| ptr.as_ptr() as *mut u8)
            .ok_or_else(|| Error::Mapping("buffer memory is not host-visible".to_string()))
    }
}

impl RendererBuffer for Buffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        // checked_add so an offset near u64::MAX cannot wrap past the check
        let end = offset.checked_add(data.len() as u64);
        if end.map_or(true, |end| end > self.size) {
            return Err(Error::OutOfBounds {
                offset,
                len: data.len() as u64,
                size: self.size,
            });
        }

        // Scoped acquisition: map, copy, flush, then unmap on all paths
        self.map()?;
        let result = (|| {
            let ptr = self.host_ptr()?;
            unsafe {
                std::ptr::copy_nonoverlapping(data.as_ptr(), ptr.add(offset as usize), data.len());
            }
            self.flush()
        })();
        self.unmap();
        result
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            // Free GPU memory
            if let Some(allocation) = self.allocation.take() {
                // Don't panic if the lock fails - the buffer must still go
                if let Ok(mut allocator) = self.ctx.allocator.lock() {
                    allocator.free(allocation).ok();
                }
            }

            // Destroy buffer
            self.ctx.device.destroy_buffer(self.buffer, None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_buffer_tests.rs"]
mod tests;
