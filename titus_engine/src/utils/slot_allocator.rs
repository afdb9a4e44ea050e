/// Allocates and recycles stable per-instance `u32` indices.
///
/// Instance indices select slots in the per-frame dynamic uniform arrays,
/// so a freed index must not be handed out again while any in-flight frame
/// may still read the old instance's slot. `retire` therefore parks the
/// index until `frames_in_flight` further frames have begun; only then does
/// `collect` return it to the free pool.
///
/// # Example
///
/// ```ignore
/// let mut alloc = SlotAllocator::new(2);
/// let a = alloc.alloc();      // 0
/// let b = alloc.alloc();      // 1
/// alloc.retire(a, 10);        // frame 10 stops using slot 0
/// alloc.collect(11);          // too soon, slot 0 still parked
/// alloc.collect(12);          // slot 0 is now reusable
/// let c = alloc.alloc();      // 0 (recycled)
/// # let _ = (b, c);
/// ```
pub struct SlotAllocator {
    free_list: Vec<u32>,
    /// Retired slots waiting out the in-flight window: (slot, retire frame)
    pending: Vec<(u32, u64)>,
    frames_in_flight: u64,
    next_id: u32,
    len: u32,
}

impl SlotAllocator {
    /// Create a new empty allocator.
    ///
    /// `frames_in_flight` is the number of frames the engine pipelines
    /// concurrently; retired slots stay parked for that many frames.
    pub fn new(frames_in_flight: u32) -> Self {
        Self {
            free_list: Vec::new(),
            pending: Vec::new(),
            frames_in_flight: frames_in_flight as u64,
            next_id: 0,
            len: 0,
        }
    }

    /// Allocate the next available slot index
    pub fn alloc(&mut self) -> u32 {
        self.len += 1;
        self.free_list.pop().unwrap_or_else(|| {
            let id = self.next_id;
            self.next_id += 1;
            id
        })
    }

    /// Retire a slot index at the given frame counter.
    ///
    /// The index becomes reusable once `collect` is called with a frame
    /// counter at least `frames_in_flight` ahead of `current_frame`.
    pub fn retire(&mut self, id: u32, current_frame: u64) {
        debug_assert!(id < self.next_id, "retiring an unallocated slot: {}", id);
        self.len -= 1;
        self.pending.push((id, current_frame));
    }

    /// Recycle retired slots no in-flight frame can still be reading.
    ///
    /// Call once per frame with the monotonically increasing frame counter.
    pub fn collect(&mut self, current_frame: u64) {
        let window = self.frames_in_flight;
        let free_list = &mut self.free_list;
        self.pending.retain(|&(id, retired_at)| {
            if current_frame >= retired_at + window {
                free_list.push(id);
                false
            } else {
                true
            }
        });
    }

    /// Highest index ever allocated + 1.
    ///
    /// This is the minimum capacity the backing storage must have to
    /// accommodate all allocated indices.
    pub fn high_water_mark(&self) -> u32 {
        self.next_id
    }

    /// Number of currently allocated slots
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether no slots are currently allocated
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
#[path = "slot_allocator_tests.rs"]
mod tests;
