/// Buffer trait and buffer descriptor

use crate::error::Result;
use bitflags::bitflags;

bitflags! {
    /// Buffer usage flags (combinable, e.g. `VERTEX | TRANSFER_DST`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BufferUsage: u32 {
        /// Vertex buffer
        const VERTEX = 1 << 0;
        /// Index buffer
        const INDEX = 1 << 1;
        /// Uniform/constant buffer
        const UNIFORM = 1 << 2;
        /// Storage buffer
        const STORAGE = 1 << 3;
        /// Source of a device-side copy (staging buffers)
        const TRANSFER_SRC = 1 << 4;
        /// Destination of a device-side copy
        const TRANSFER_DST = 1 << 5;
    }
}

/// Memory residency class for a buffer allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryClass {
    /// Device-local memory, not host-visible (fastest GPU access)
    GpuOnly,
    /// Host-visible memory optimized for CPU writes read by the device
    CpuToGpu,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes (fixed for the buffer's lifetime; no resize)
    pub size: u64,
    /// Buffer usage flags
    pub usage: BufferUsage,
    /// Memory residency class
    pub memory: MemoryClass,
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types. The backing allocation is
/// released when the buffer is dropped.
pub trait Buffer: Send + Sync {
    /// Buffer size in bytes
    fn size(&self) -> u64;

    /// Write `data` into the byte range `[offset, offset + data.len())`
    ///
    /// Fails with [`Error::OutOfBounds`](crate::Error) if the range exceeds
    /// the buffer's extent. Bytes outside the range are left untouched.
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;
}
