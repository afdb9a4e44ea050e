/// Dynamic uniform array - many per-instance records in one buffer
///
/// Device uniform-buffer bindings commonly require offsets aligned to a
/// hardware-reported granularity. Padding each instance's record up to that
/// granularity lets a single buffer plus a per-draw dynamic offset serve
/// arbitrarily many per-object constant blocks without per-object
/// descriptor sets.

use std::marker::PhantomData;
use std::sync::Arc;

use bytemuck::Pod;

use crate::error::{Error, Result};
use crate::renderer::{Buffer, BufferDesc, BufferUsage, MemoryClass, Renderer};

/// Round `size` up to the smallest multiple of `align` that is `>= size`.
///
/// An alignment of 0 means "no alignment requirement" and returns `size`
/// unchanged.
pub fn align_up(size: u64, align: u64) -> u64 {
    if align == 0 {
        size
    } else {
        size.div_ceil(align) * align
    }
}

/// `capacity` independently-updatable instances of a record `T`, packed into
/// one uniform buffer at a device-aligned stride.
///
/// The stride returned by [`stride`](Self::stride) is the same value the
/// bind path must use to compute per-draw dynamic offsets; a mismatch
/// between the write path and the bind path reads another instance's data
/// instead of crashing.
pub struct DynamicUniformArray<T: Pod> {
    buffer: Arc<dyn Buffer>,
    stride: u64,
    capacity: u32,
    _record: PhantomData<T>,
}

impl<T: Pod> DynamicUniformArray<T> {
    /// Create an array of `capacity` instances.
    ///
    /// The element stride is `size_of::<T>()` rounded up to the device's
    /// minimum uniform-buffer offset alignment; the backing buffer holds
    /// `stride * capacity` bytes of CpuToGpu memory.
    pub fn new(renderer: &mut dyn Renderer, capacity: u32) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::Allocation(
                "dynamic uniform array capacity must be non-zero".to_string(),
            ));
        }

        let min_alignment = renderer.limits().min_uniform_buffer_offset_alignment;
        let stride = align_up(std::mem::size_of::<T>() as u64, min_alignment);

        let buffer = renderer.create_buffer(BufferDesc {
            size: stride * capacity as u64,
            usage: BufferUsage::UNIFORM,
            memory: MemoryClass::CpuToGpu,
        })?;

        crate::engine_debug!(
            "titus::DynamicUniformArray",
            "element stride set to {} bytes ({} instances)",
            stride,
            capacity
        );

        Ok(Self {
            buffer,
            stride,
            capacity,
            _record: PhantomData,
        })
    }

    /// Write one instance's record.
    ///
    /// Touches exactly the byte range
    /// `[index * stride, index * stride + size_of::<T>())`; all other
    /// instances are left unchanged.
    pub fn update(&self, index: u32, value: &T) -> Result<()> {
        if index >= self.capacity {
            return Err(Error::IndexOutOfRange {
                index,
                capacity: self.capacity,
            });
        }
        self.buffer
            .update(index as u64 * self.stride, bytemuck::bytes_of(value))
    }

    /// Element stride in bytes (a multiple of the device's minimum
    /// uniform-buffer offset alignment)
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Maximum instance count (fixed at construction)
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Dynamic binding offset of one instance (`index * stride`)
    pub fn offset_of(&self, index: u32) -> u64 {
        index as u64 * self.stride
    }

    /// Backing buffer (for descriptor writes)
    pub fn buffer(&self) -> &Arc<dyn Buffer> {
        &self.buffer
    }
}

#[cfg(test)]
#[path = "dynamic_uniform_tests.rs"]
mod tests;
