/// Mock renderer for unit tests (no GPU required)
///
/// The mock buffer stores real bytes so tests can assert byte-exact
/// read-back of uniform writes, and mirrors the map/unmap/flush contract of
/// the backend buffers (idempotent map/unmap, flush always callable).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::renderer::{Buffer, BufferDesc, DeviceLimits, MemoryClass, Renderer};

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub desc: BufferDesc,
    data: Mutex<Vec<u8>>,
    mapped: AtomicBool,
}

impl MockBuffer {
    pub fn new(desc: BufferDesc) -> Self {
        let size = desc.size as usize;
        Self {
            desc,
            data: Mutex::new(vec![0u8; size]),
            mapped: AtomicBool::new(false),
        }
    }

    /// Obtain host access; no-op if already mapped
    pub fn map(&self) -> Result<()> {
        if self.desc.memory == MemoryClass::GpuOnly {
            return Err(Error::Mapping(
                "buffer memory is not host-visible".to_string(),
            ));
        }
        self.mapped.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Release host access; no-op if not mapped
    pub fn unmap(&self) {
        self.mapped.store(false, Ordering::SeqCst);
    }

    /// Make host writes visible to the device; always callable
    pub fn flush(&self) -> Result<()> {
        Ok(())
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped.load(Ordering::SeqCst)
    }

    /// Read back a byte range (test-only observation point)
    pub fn bytes(&self, offset: u64, len: usize) -> Vec<u8> {
        let data = self.data.lock().unwrap();
        data[offset as usize..offset as usize + len].to_vec()
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.desc.size
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        // checked_add so an offset near u64::MAX cannot wrap past the check
        let end = offset.checked_add(data.len() as u64);
        if end.map_or(true, |end| end > self.desc.size) {
            return Err(Error::OutOfBounds {
                offset,
                len: data.len() as u64,
                size: self.desc.size,
            });
        }
        // Scoped acquisition: map, copy, flush, unmap on all paths
        self.map()?;
        let result = (|| {
            let mut stored = self.data.lock().unwrap();
            stored[offset as usize..offset as usize + data.len()].copy_from_slice(data);
            self.flush()
        })();
        self.unmap();
        result
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

pub struct MockRenderer {
    limits: DeviceLimits,
    /// Every buffer created through this renderer, in creation order,
    /// so tests can observe their contents.
    pub buffers: Vec<Arc<MockBuffer>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::with_limits(DeviceLimits::default())
    }

    pub fn with_limits(limits: DeviceLimits) -> Self {
        Self {
            limits,
            buffers: Vec::new(),
        }
    }
}

impl Renderer for MockRenderer {
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        let buffer = Arc::new(MockBuffer::new(desc));
        self.buffers.push(Arc::clone(&buffer));
        Ok(buffer)
    }

    fn limits(&self) -> DeviceLimits {
        self.limits
    }

    fn wait_idle(&self) -> Result<()> {
        Ok(())
    }
}

#[path = "mock_renderer_tests.rs"]
mod tests;
