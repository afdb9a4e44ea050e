use super::*;
use crate::renderer::BufferUsage;

fn host_visible_buffer(size: u64) -> MockBuffer {
    MockBuffer::new(BufferDesc {
        size,
        usage: BufferUsage::UNIFORM,
        memory: MemoryClass::CpuToGpu,
    })
}

#[test]
fn test_map_is_idempotent() {
    let buffer = host_visible_buffer(64);
    buffer.map().unwrap();
    buffer.map().unwrap();
    assert!(buffer.is_mapped());
}

#[test]
fn test_unmap_is_idempotent() {
    let buffer = host_visible_buffer(64);
    buffer.unmap();
    buffer.map().unwrap();
    buffer.unmap();
    buffer.unmap();
    assert!(!buffer.is_mapped());
}

#[test]
fn test_map_fails_on_device_local_memory() {
    let buffer = MockBuffer::new(BufferDesc {
        size: 64,
        usage: BufferUsage::VERTEX | BufferUsage::TRANSFER_DST,
        memory: MemoryClass::GpuOnly,
    });
    assert!(matches!(buffer.map(), Err(Error::Mapping(_))));
}

#[test]
fn test_flush_is_always_callable() {
    let buffer = host_visible_buffer(64);
    buffer.flush().unwrap();
    buffer.map().unwrap();
    buffer.flush().unwrap();
}

#[test]
fn test_update_writes_exact_range() {
    let buffer = host_visible_buffer(16);
    buffer.update(4, &[1, 2, 3, 4]).unwrap();
    assert_eq!(buffer.bytes(0, 16), [0, 0, 0, 0, 1, 2, 3, 4, 0, 0, 0, 0, 0, 0, 0, 0]);
    // update leaves the buffer unmapped afterwards
    assert!(!buffer.is_mapped());
}

#[test]
fn test_update_out_of_bounds() {
    let buffer = host_visible_buffer(16);
    let err = buffer.update(12, &[0u8; 8]).unwrap_err();
    assert!(matches!(
        err,
        Error::OutOfBounds {
            offset: 12,
            len: 8,
            size: 16
        }
    ));
}

#[test]
fn test_update_offset_overflow_is_out_of_bounds() {
    // offset + len wraps u64; the range check must still reject it
    let buffer = host_visible_buffer(16);
    let err = buffer.update(u64::MAX - 2, &[0u8; 8]).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { size: 16, .. }));
    assert!(!buffer.is_mapped());
}

#[test]
fn test_renderer_tracks_created_buffers() {
    let mut renderer = MockRenderer::new();
    renderer
        .create_buffer(BufferDesc {
            size: 128,
            usage: BufferUsage::UNIFORM,
            memory: MemoryClass::CpuToGpu,
        })
        .unwrap();
    assert_eq!(renderer.buffers.len(), 1);
    assert_eq!(renderer.buffers[0].size(), 128);
}
