/// Draw-list types handed to the backend each frame

use std::sync::Arc;

use glam::Mat4;

use crate::resource::Resource;

/// One drawable object in a frame's draw list
///
/// The instance index must be stable over the object's lifetime so repeated
/// per-frame uniform writes always target the same slot in the dynamic
/// uniform array. Reclaiming an index after an object is destroyed must wait
/// until no in-flight frame still reads that slot; see
/// [`SlotAllocator`](crate::utils::SlotAllocator).
#[derive(Clone)]
pub struct DrawItem {
    /// Mesh resource (must carry a mesh payload; other payloads are dropped
    /// with a warning at draw time)
    pub mesh: Arc<Resource>,

    /// Object-to-world transform
    pub transform: Mat4,

    /// Stable per-instance index into the dynamic uniform array
    pub instance_index: u32,
}
