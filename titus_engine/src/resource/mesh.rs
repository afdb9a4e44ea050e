/// Mesh resource payload

use std::sync::Arc;

use crate::renderer::Buffer;

/// A loaded mesh: GPU vertex/index buffers ready to bind.
///
/// Indices are 16-bit. The buffers are shared with every holder of the
/// owning [`Resource`](crate::resource::Resource) and released when the
/// last strong reference drops.
pub struct MeshResource {
    /// Vertex buffer
    pub vertex_buffer: Arc<dyn Buffer>,
    /// Index buffer (u16 indices)
    pub index_buffer: Arc<dyn Buffer>,
    /// Number of indices to draw
    pub index_count: u32,
}
